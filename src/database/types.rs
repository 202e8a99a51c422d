use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Two-decimal quantities stored as TEXT so SQLite never rounds them through a float.
macro_rules! decimal_newtype {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        $vis struct $name(BigDecimal);

        impl $name {
            pub fn zero() -> Self {
                Self(BigDecimal::from(0))
            }

            pub fn is_negative(&self) -> bool {
                self.0 < BigDecimal::from(0)
            }

            pub fn is_positive(&self) -> bool {
                self.0 > BigDecimal::from(0)
            }

            /// True when the value carries no more than two decimal places.
            pub fn is_hundredths(&self) -> bool {
                self.0.with_scale(2) == self.0
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(BigDecimal::from(value))
            }
        }

        impl From<BigDecimal> for $name {
            fn from(value: BigDecimal) -> Self {
                Self(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = bigdecimal::ParseBigDecimalError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<BigDecimal>().map(Self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0.with_scale(2))
            }
        }

        impl std::ops::Add<&$name> for &$name {
            type Output = $name;

            fn add(self, rhs: &$name) -> $name {
                $name(&self.0 + &rhs.0)
            }
        }

        impl std::ops::Sub<&$name> for &$name {
            type Output = $name;

            fn sub(self, rhs: &$name) -> $name {
                $name(&self.0 - &rhs.0)
            }
        }

        impl<'a> std::iter::Sum<&'a $name> for $name {
            fn sum<I: Iterator<Item = &'a $name>>(iter: I) -> Self {
                iter.fold($name::zero(), |acc, value| &acc + value)
            }
        }

        impl sqlx::Type<sqlx::Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <String as sqlx::Type<sqlx::Sqlite>>::type_info()
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                let s = self.0.with_scale(2).to_string();
                <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode(s, buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $name {
            fn decode(
                value: sqlx::sqlite::SqliteValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
                let decimal = s
                    .parse::<BigDecimal>()
                    .map_err(|e| format!("Invalid {} '{}': {}", stringify!($name), s, e))?;
                Ok(Self(decimal))
            }
        }
    };
}

decimal_newtype! {
    /// A number of leave days; half days are expressed as `0.5`.
    pub struct Days;
}

decimal_newtype! {
    pub struct Money;
}

impl Days {
    /// Smallest bookable leave request.
    pub fn half_day() -> Self {
        Days(BigDecimal::new(5.into(), 1))
    }

    pub fn full_year() -> Self {
        Days::from(365)
    }
}
