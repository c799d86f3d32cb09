//! `define_port_error!` generates `thiserror` enums for driven ports, plus a
//! snake_case constructor per variant that accepts `impl Into<_>` fields.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum ShelfError {
            Jammed { shelf: String } => "shelf {shelf} is jammed",
            Overfull { capacity: u32, requested: u32 } =>
                "shelf holds {capacity}, asked for {requested}",
            Gone => "shelf is gone",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(ShelfError::jammed("top").to_string(), "shelf top is jammed");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        let err = ShelfError::overfull(3_u32, 5_u32);
        assert_eq!(
            err,
            ShelfError::Overfull {
                capacity: 3,
                requested: 5
            }
        );
        assert_eq!(err.to_string(), "shelf holds 3, asked for 5");
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(ShelfError::gone(), ShelfError::Gone);
    }
}
