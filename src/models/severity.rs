/// Display classification of the severity labels the service emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Severe,
    General,
    Minor,
}

impl Severity {
    pub const SEVERE_LABEL: &'static str = "严重";
    pub const GENERAL_LABEL: &'static str = "一般";

    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            Self::SEVERE_LABEL => Severity::Severe,
            Self::GENERAL_LABEL => Severity::General,
            _ => Severity::Minor,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Severity::Severe => "🔴",
            Severity::General => "🟡",
            Severity::Minor => "🔵",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_to_levels() {
        assert_eq!(Severity::from_label("严重"), Severity::Severe);
        assert_eq!(Severity::from_label(" 一般 "), Severity::General);
        assert_eq!(Severity::from_label("轻微"), Severity::Minor);
        assert_eq!(Severity::from_label(""), Severity::Minor);
    }
}
