//! Fixed page sizes per listing.

use std::num::NonZeroU32;

use pagination::{PageRequest, PageSize};

/// Paginated listings exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// Categories, 5 per page.
    Categories,
    /// Recipes, 3 per page.
    Recipes,
    /// Users, 5 per page.
    Users,
}

const FIVE: NonZeroU32 = NonZeroU32::MIN.saturating_add(4);
const THREE: NonZeroU32 = NonZeroU32::MIN.saturating_add(2);

impl Listing {
    /// Items per page for this listing.
    pub const fn page_size(self) -> PageSize {
        match self {
            Self::Categories | Self::Users => PageSize::from_non_zero(FIVE),
            Self::Recipes => PageSize::from_non_zero(THREE),
        }
    }

    /// Normalise a raw page number for this listing.
    ///
    /// # Examples
    /// ```
    /// use culinaria::domain::Listing;
    ///
    /// let request = Listing::Recipes.page(Some(0));
    /// assert_eq!(request.number(), 1);
    /// assert_eq!(request.size().get(), 3);
    /// ```
    pub fn page(self, raw: Option<i64>) -> PageRequest {
        PageRequest::from_raw(raw, self.page_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Listing::Categories, 5)]
    #[case(Listing::Recipes, 3)]
    #[case(Listing::Users, 5)]
    fn page_sizes_are_fixed(#[case] listing: Listing, #[case] size: u32) {
        assert_eq!(listing.page_size().get(), size);
    }
}
