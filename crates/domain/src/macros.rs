//! Macro for string conversions of closed domain enums
//!
//! Enums such as `EmploymentType` and `ReportGroup` travel as lowercase
//! strings in query parameters and database columns. The macro generates
//! `as_str`, `Display` and a case-insensitive `FromStr` whose error is a
//! user-facing [`TimebookError`](crate::TimebookError).
//!
//! # Example
//!
//! ```rust
//! use timebook_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Shift {
//!     Morning,
//!     Night,
//! }
//!
//! impl_domain_status_conversions!(Shift {
//!     Morning => "morning",
//!     Night => "night",
//! });
//!
//! assert_eq!("NIGHT".parse::<Shift>().unwrap(), Shift::Night);
//! assert_eq!(Shift::Morning.as_str(), "morning");
//! ```

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum.
///
/// Parsing trims and ignores case; an unknown value yields
/// `TimebookError::Validation` naming the accepted values.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical lowercase name
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::TimebookError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::TimebookError::validation(format!(
                        "Invalid {}: '{}' (expected one of: {})",
                        stringify!($enum_name),
                        s,
                        [$($str),+].join(", ")
                    ))),
                }
            }
        }
    };
}
