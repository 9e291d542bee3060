//! Roster data types.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{HrError, HrResult};

pub type EmployeeId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Department {
    Engineering,
    Marketing,
    Sales,
    #[serde(rename = "HR")]
    Hr,
    Finance,
    Product,
    Design,
}

impl Department {
    pub const ALL: [Department; 7] = [
        Department::Engineering,
        Department::Marketing,
        Department::Sales,
        Department::Hr,
        Department::Finance,
        Department::Product,
        Department::Design,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Department::Engineering => "Engineering",
            Department::Marketing => "Marketing",
            Department::Sales => "Sales",
            Department::Hr => "HR",
            Department::Finance => "Finance",
            Department::Product => "Product",
            Department::Design => "Design",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown department `{0}`")]
pub struct UnknownDepartment(pub String);

impl FromStr for Department {
    type Err = UnknownDepartment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Department::ALL
            .into_iter()
            .find(|dept| dept.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownDepartment(needle.to_string()))
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("rating {0} is outside {min}..={max}", min = Rating::MIN, max = Rating::MAX)]
pub struct InvalidRating(pub i64);

/// Performance rating, always within `MIN..=MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    /// Rating given to manually added employees.
    pub const DEFAULT: Rating = Rating(3);

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub const fn clamped(value: i64) -> Self {
        if value < Self::MIN as i64 {
            Self(Self::MIN)
        } else if value > Self::MAX as i64 {
            Self(Self::MAX)
        } else {
            Self(value as u8)
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// One step up, saturating at `MAX`.
    pub fn promoted(self) -> Self {
        Self(self.0.saturating_add(1).min(Self::MAX))
    }

    pub fn all() -> impl Iterator<Item = Rating> {
        (Self::MIN..=Self::MAX).map(Rating)
    }
}

impl TryFrom<i64> for Rating {
    type Error = InvalidRating;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Rating::new)
            .ok_or(InvalidRating(value))
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub image: String,
    pub address: Address,
    pub department: Department,
    pub performance: Rating,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect()
    }
}

/// An employee that has not been given an identifier yet.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub image: String,
    pub address: Address,
    pub department: Department,
    #[serde(default)]
    pub performance: Option<Rating>,
}

impl NewEmployee {
    pub fn into_employee(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            age: self.age,
            image: self.image,
            address: self.address,
            department: self.department,
            performance: self.performance.unwrap_or(Rating::DEFAULT),
        }
    }
}

const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 100;

/// Raw add-employee form input.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub department: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    #[serde(default)]
    pub state: Option<String>,
}

impl EmployeeForm {
    pub fn validate(self) -> HrResult<NewEmployee> {
        let required = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("age", &self.age),
            ("department", &self.department),
            ("address", &self.address),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(HrError::InvalidInput(format!("{field} is required")));
        }

        let email = self.email.trim().to_string();
        if !email.contains('@') {
            return Err(HrError::InvalidInput(format!("invalid email `{email}`")));
        }
        let age = self
            .age
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
            .ok_or_else(|| {
                HrError::InvalidInput(format!("age must be between {MIN_AGE} and {MAX_AGE}"))
            })?;
        let department = self
            .department
            .parse::<Department>()
            .map_err(|err| HrError::InvalidInput(err.to_string()))?;

        Ok(NewEmployee {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            image: format!("https://i.pravatar.cc/150?u={email}"),
            email,
            phone: self.phone.trim().to_string(),
            age,
            address: Address {
                address: self.address.trim().to_string(),
                city: self.city.trim().to_string(),
                postal_code: self.postal_code.trim().to_string(),
                state: self
                    .state
                    .map(|state| state.trim().to_string())
                    .filter(|state| !state.is_empty()),
            },
            department,
            performance: Some(Rating::DEFAULT),
        })
    }
}
