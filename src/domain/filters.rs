//! Search filter dimensions
//!
//! Each dimension is a closed set of opaque site codes. The `Default` variant of
//! every enum is the unfiltered value, which serializes to an empty code and is
//! left out of search URLs.

use serde::{Deserialize, Serialize};

macro_rules! filter_codes {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Site code; empty for the unfiltered value
            pub const fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            pub const fn is_unfiltered(self) -> bool {
                self.code().is_empty()
            }
        }
    };
}

filter_codes! {
    /// Result ordering
    Sort {
        #[default]
        Default => "",
        TotalRecommend => "2",
        CharCount => "3",
        LastUpdated => "5",
        RecentFinished => "6",
        WeekRecommend => "9",
        MonthRecommend => "10",
        TotalBookmark => "11",
    }
}

filter_codes! {
    /// Serialization state
    State {
        #[default]
        All => "",
        OnGoing => "1",
        Finished => "2",
    }
}

filter_codes! {
    /// Contract status
    Sign {
        /// 全部作品
        #[default]
        All => "",
        /// 签约作品
        Signed => "1",
        /// 精品小说
        Choicest => "2",
    }
}

filter_codes! {
    /// Paid-chapter status
    Vip {
        #[default]
        All => "",
        Free => "1",
        Paid => "2",
    }
}

filter_codes! {
    /// Time since last update
    Update {
        #[default]
        All => "",
        In3Days => "1",
        In7Days => "2",
        InHalfMonth => "3",
        InMonth => "4",
    }
}

filter_codes! {
    /// Word count bracket
    Size {
        #[default]
        All => "",
        Lt300k => "1",
        Gt300kLt500k => "2",
        Gt500kLt1m => "3",
        Gt1mLt2m => "4",
        Gt2m => "5",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unfiltered() {
        assert!(Sort::default().is_unfiltered());
        assert!(State::default().is_unfiltered());
        assert!(Sign::default().is_unfiltered());
        assert!(Vip::default().is_unfiltered());
        assert!(Update::default().is_unfiltered());
        assert!(Size::default().is_unfiltered());
    }

    #[test]
    fn test_codes() {
        assert_eq!(Sort::TotalBookmark.code(), "11");
        assert_eq!(State::Finished.code(), "2");
        assert_eq!(Vip::Free.code(), "1");
        assert_eq!(Size::Gt2m.code(), "5");
    }
}
