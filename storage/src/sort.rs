// storage/src/sort.rs

use std::str::FromStr;

use models::errors::RegistryError;

/// Fields a sorted view can be keyed on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl FromStr for SortField {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "height" => Ok(SortField::Height),
            "weight" => Ok(SortField::Weight),
            "bmi" => Ok(SortField::Bmi),
            _ => Err(RegistryError::InvalidArgument(format!(
                "invalid sort field '{}', select from height, weight or bmi",
                s
            ))),
        }
    }
}

/// Direction of a sorted view.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(RegistryError::InvalidArgument(format!(
                "invalid sort order '{}', select asc or desc",
                s
            ))),
        }
    }
}
