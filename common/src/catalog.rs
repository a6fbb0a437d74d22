use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CatalogError;

/// How long a package grants access for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Hours(u32),
    Days(u32),
}

impl Validity {
    const MAX_DAYS: u32 = 36_500;

    fn days(&self) -> u32 {
        match *self {
            Validity::Hours(hours) => hours.div_ceil(24),
            Validity::Days(days) => days,
        }
    }

    pub fn expires_at(&self, from: NaiveDateTime) -> NaiveDateTime {
        match *self {
            Validity::Hours(hours) => from
                .checked_add_signed(TimeDelta::hours(i64::from(hours)))
                .unwrap_or(NaiveDateTime::MAX),
            Validity::Days(days) => from
                .checked_add_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDateTime::MAX),
        }
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validity::Hours(n) => write!(f, "{}h", n),
            Validity::Days(n) => write!(f, "{}d", n),
        }
    }
}

impl FromStr for Validity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s.char_indices().last().map(|(i, _)| i).unwrap_or(0);
        let (number, unit) = s.split_at(split);
        let amount: u32 = number
            .parse()
            .map_err(|_| format!("invalid validity `{}`", s))?;
        if amount == 0 {
            return Err(format!("validity `{}` must be positive", s));
        }
        match unit {
            "h" => Ok(Validity::Hours(amount)),
            "d" => Ok(Validity::Days(amount)),
            _ => Err(format!("validity `{}` must end with `h` or `d`", s)),
        }
    }
}

impl Serialize for Validity {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Validity {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Validity::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub validity: Validity,
}

impl Package {
    fn new(id: &str, name: &str, price: i64, validity: Validity) -> Self {
        Package {
            id: id.to_string(),
            name: name.to_string(),
            price,
            validity,
        }
    }
}

/// Read-only table of the packages on offer.
#[derive(Debug, Clone)]
pub struct Catalog {
    packages: Vec<Package>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog {
            packages: vec![
                Package::new("1h", "1 Hour", 10, Validity::Hours(1)),
                Package::new("6h", "6 Hours", 20, Validity::Hours(6)),
                Package::new("12h", "12 Hours", 30, Validity::Hours(12)),
                Package::new("1d", "1 Day", 50, Validity::Days(1)),
            ],
        }
    }
}

impl Catalog {
    pub fn new(packages: Vec<Package>) -> Result<Self, CatalogError> {
        if packages.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for package in packages.iter() {
            if package.id.trim().is_empty() {
                return Err(CatalogError::Invalid {
                    id: package.id.clone(),
                    reason: "id must not be empty".to_string(),
                });
            }
            if !seen.insert(package.id.clone()) {
                return Err(CatalogError::Invalid {
                    id: package.id.clone(),
                    reason: "duplicate id".to_string(),
                });
            }
            if package.validity.days() > Validity::MAX_DAYS {
                return Err(CatalogError::Invalid {
                    id: package.id.clone(),
                    reason: format!(
                        "validity {} exceeds {} days",
                        package.validity,
                        Validity::MAX_DAYS
                    ),
                });
            }
            if package.price <= 0 {
                return Err(CatalogError::Invalid {
                    id: package.id.clone(),
                    reason: "price must be positive".to_string(),
                });
            }
        }
        Ok(Catalog { packages })
    }

    pub async fn from_yaml_file(path: &str) -> Result<Self, CatalogError> {
        let content = tokio::fs::read_to_string(path).await?;
        let catalog = Self::from_yaml_str(&content)?;
        log::debug!("Loaded package catalog from {}: {:#?}", path, catalog.packages);
        Ok(catalog)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let packages: Vec<Package> = serde_yaml::from_str(content)?;
        Self::new(packages)
    }

    pub fn lookup(&self, package_id: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.id == package_id)
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }
}
