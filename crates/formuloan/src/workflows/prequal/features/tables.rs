use serde::{Deserialize, Serialize};

/// Closed set of employment statuses the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentStatus {
    FullTime,
    NotEmployed,
    Other,
    PartTime,
    Retired,
    SelfEmployed,
}

impl EmploymentStatus {
    pub const ALL: [EmploymentStatus; 6] = [
        EmploymentStatus::FullTime,
        EmploymentStatus::NotEmployed,
        EmploymentStatus::Other,
        EmploymentStatus::PartTime,
        EmploymentStatus::Retired,
        EmploymentStatus::SelfEmployed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EmploymentStatus::FullTime => "Full-time",
            EmploymentStatus::NotEmployed => "Not employed",
            EmploymentStatus::Other => "Other",
            EmploymentStatus::PartTime => "Part-time",
            EmploymentStatus::Retired => "Retired",
            EmploymentStatus::SelfEmployed => "Self-employed",
        }
    }

    /// Unknown or blank labels fall back to `Other`.
    pub fn from_label(raw: &str) -> Self {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(raw))
            .unwrap_or(EmploymentStatus::Other)
    }

    pub fn column(self) -> String {
        format!("EmploymentStatus_{}", self.label())
    }
}

/// Regional grouping of US states, numbered 1 through 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateCluster(u8);

impl StateCluster {
    pub const COUNT: u8 = 6;
    pub const DEFAULT: StateCluster = StateCluster(6);

    pub fn for_code(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        STATE_CLUSTERS
            .binary_search_by(|(state, _)| (*state).cmp(code.as_str()))
            .map(|index| StateCluster(STATE_CLUSTERS[index].1))
            .unwrap_or(Self::DEFAULT)
    }

    pub fn id(self) -> u8 {
        self.0
    }

    pub fn column(id: u8) -> String {
        format!("StateCluster_{id}")
    }
}

// Sorted by code for binary search.
static STATE_CLUSTERS: [(&str, u8); 51] = [
    ("AK", 2),
    ("AL", 5),
    ("AR", 1),
    ("AZ", 5),
    ("CA", 6),
    ("CO", 6),
    ("CT", 2),
    ("DC", 2),
    ("DE", 2),
    ("FL", 2),
    ("GA", 6),
    ("HI", 3),
    ("IA", 4),
    ("ID", 5),
    ("IL", 6),
    ("IN", 6),
    ("KS", 6),
    ("KY", 1),
    ("LA", 1),
    ("MA", 2),
    ("MD", 6),
    ("ME", 4),
    ("MI", 5),
    ("MN", 6),
    ("MO", 5),
    ("MS", 1),
    ("MT", 6),
    ("NC", 6),
    ("ND", 4),
    ("NE", 6),
    ("NH", 6),
    ("NJ", 2),
    ("NM", 5),
    ("NV", 1),
    ("NY", 2),
    ("OH", 6),
    ("OK", 6),
    ("OR", 5),
    ("PA", 1),
    ("RI", 1),
    ("SC", 2),
    ("SD", 1),
    ("TN", 1),
    ("TX", 2),
    ("UT", 5),
    ("VA", 2),
    ("VT", 6),
    ("WA", 6),
    ("WI", 6),
    ("WV", 2),
    ("WY", 2),
];
