/// Fixed lookup table mapping categorical labels to integer positions
///
/// Tables are constants; nothing mutates them at runtime. Lookups are
/// case-insensitive and unknown labels fall back to the neutral position.
#[derive(Debug, Clone, Copy)]
pub struct OrdinalScale {
    pub name: &'static str,
    pub entries: &'static [(&'static str, u8)],
    pub neutral: u8,
    pub size: u8,
}

impl OrdinalScale {
    /// Position of a label on the scale, neutral for unknown or missing labels
    pub fn position(&self, label: Option<&str>) -> u8 {
        let Some(label) = label else {
            return self.neutral;
        };
        let needle = label.trim().to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| *key == needle)
            .map(|(_, position)| *position)
            .unwrap_or(self.neutral)
    }

    /// Whether the label is present in the table
    pub fn recognizes(&self, label: &str) -> bool {
        let needle = label.trim().to_lowercase();
        self.entries.iter().any(|(key, _)| *key == needle)
    }
}

pub const EDUCATION: OrdinalScale = OrdinalScale {
    name: "education",
    entries: &[
        ("less than high school", 1),
        ("no diploma", 1),
        ("none", 1),
        ("high school", 2),
        ("ged", 2),
        ("some college", 3),
        ("associate", 3),
        ("associate's", 3),
        ("vocational", 3),
        ("bachelor", 4),
        ("bachelors", 4),
        ("bachelor's", 4),
        ("college", 4),
        ("master", 5),
        ("masters", 5),
        ("master's", 5),
        ("graduate", 5),
        ("doctorate", 5),
        ("phd", 5),
        ("professional", 5),
    ],
    neutral: 3,
    size: 5,
};

pub const INCOME: OrdinalScale = OrdinalScale {
    name: "income",
    entries: &[
        ("low", 1),
        ("under 25k", 1),
        ("lower-middle", 2),
        ("lower middle", 2),
        ("25k-50k", 2),
        ("middle", 3),
        ("50k-75k", 3),
        ("upper-middle", 4),
        ("upper middle", 4),
        ("75k-150k", 4),
        ("high", 5),
        ("over 150k", 5),
    ],
    neutral: 3,
    size: 5,
};

pub const RISK_LEVEL: OrdinalScale = OrdinalScale {
    name: "risk_level",
    entries: &[
        ("low", 1),
        ("minimal", 1),
        ("moderate", 2),
        ("medium", 2),
        ("high", 3),
        ("very high", 4),
        ("severe", 4),
    ],
    neutral: 2,
    size: 4,
};

pub const AGE_GROUP: OrdinalScale = OrdinalScale {
    name: "age_group",
    entries: &[
        ("child", 1),
        ("0-17", 1),
        ("young adult", 2),
        ("18-29", 2),
        ("adult", 3),
        ("30-44", 3),
        ("middle-aged", 4),
        ("middle aged", 4),
        ("45-64", 4),
        ("senior", 5),
        ("elderly", 5),
        ("65+", 5),
    ],
    neutral: 3,
    size: 5,
};

pub const URBANICITY: OrdinalScale = OrdinalScale {
    name: "urbanicity",
    entries: &[
        ("rural", 1),
        ("suburban", 2),
        ("urban", 3),
    ],
    neutral: 2,
    size: 3,
};

/// Alignment between two integer positions: `max(0, 1 - |a - b| / scale_size)`
#[inline]
pub fn positional_alignment(a: u8, b: u8, scale_size: u8) -> f64 {
    if scale_size == 0 {
        return if a == b { 1.0 } else { 0.0 };
    }
    let distance = (a as f64 - b as f64).abs();
    (1.0 - distance / scale_size as f64).max(0.0)
}

/// Alignment between two categorical labels on the same scale
#[inline]
pub fn ordinal_alignment(scale: &OrdinalScale, a: Option<&str>, b: Option<&str>) -> f64 {
    positional_alignment(scale.position(a), scale.position(b), scale.size)
}
