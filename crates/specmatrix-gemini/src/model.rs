//! Gemini model variants.

/// Models offered for matrix generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ModelType {
    /// Fast, low-cost default
    #[default]
    Flash,
    /// Slower model with stronger reasoning
    Pro,
}

impl ModelType {
    /// Gemini API model identifier
    #[inline]
    #[must_use = "returns Gemini model identifier"]
    pub const fn model_id(&self) -> &'static str {
        match self {
            Self::Flash => "gemini-2.5-flash",
            Self::Pro => "gemini-3-pro-preview",
        }
    }

    /// Short description for listings.
    #[inline]
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Flash => "Flash (fast)",
            Self::Pro => "Pro (smart)",
        }
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.model_id())
    }
}

impl std::str::FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flash" | "gemini-2.5-flash" => Ok(Self::Flash),
            "pro" | "gemini-3-pro-preview" => Ok(Self::Pro),
            _ => Err(format!(
                "unknown model '{s}'. Valid options: flash, pro, gemini-2.5-flash, gemini-3-pro-preview"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_display() {
        assert_eq!(format!("{}", ModelType::Flash), "gemini-2.5-flash");
        assert_eq!(format!("{}", ModelType::Pro), "gemini-3-pro-preview");
    }

    #[test]
    fn test_model_from_str() {
        assert_eq!("flash".parse::<ModelType>().unwrap(), ModelType::Flash);
        assert_eq!("PRO".parse::<ModelType>().unwrap(), ModelType::Pro);
        assert_eq!(
            "gemini-2.5-flash".parse::<ModelType>().unwrap(),
            ModelType::Flash
        );
        assert!("gpt-4o".parse::<ModelType>().is_err());
    }

    #[test]
    fn test_model_roundtrip() {
        for model in [ModelType::Flash, ModelType::Pro] {
            let parsed: ModelType = model.model_id().parse().unwrap();
            assert_eq!(parsed, model, "round-trip failed for {model}");
        }
    }
}
