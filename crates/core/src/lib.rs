#![forbid(unsafe_code)]

pub mod hierarchy;
pub mod paths;

pub mod names {
    use crate::paths::PATH_SEPARATOR;

    pub const MAX_NAME_CHARS: usize = 100;
    pub const MAX_DESCRIPTION_CHARS: usize = 500;

    #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct CategoryName(String);

    impl CategoryName {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn into_string(self) -> String {
            self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, CategoryNameError> {
            let value = value.into();
            validate_category_name(&value)?;
            Ok(Self(value))
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum CategoryNameError {
        Empty,
        TooLong,
        ContainsSeparator,
        ContainsControl,
    }

    impl CategoryNameError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::Empty => "name must not be empty",
                Self::TooLong => "name must be at most 100 characters",
                Self::ContainsSeparator => "name must not contain '.'",
                Self::ContainsControl => "name contains control characters",
            }
        }
    }

    fn validate_category_name(value: &str) -> Result<(), CategoryNameError> {
        if value.trim().is_empty() {
            return Err(CategoryNameError::Empty);
        }
        if value.chars().count() > MAX_NAME_CHARS {
            return Err(CategoryNameError::TooLong);
        }
        if value.contains(PATH_SEPARATOR) {
            return Err(CategoryNameError::ContainsSeparator);
        }
        if value.chars().any(|c| c.is_control()) {
            return Err(CategoryNameError::ContainsControl);
        }
        Ok(())
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum DescriptionError {
        TooLong,
    }

    impl DescriptionError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::TooLong => "description must be at most 500 characters",
            }
        }
    }

    pub fn validate_description(value: &str) -> Result<(), DescriptionError> {
        if value.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(DescriptionError::TooLong);
        }
        Ok(())
    }

}
