use derive_more::{Display, IsVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, IsVariant)]
pub enum Status {
    #[display("checked")]
    Checked,
    #[default]
    #[display("unchecked")]
    Unchecked,
    #[display("indeterminate")]
    Indeterminate,
}

impl Status {
    /// The status a node takes when it is clicked. A partial selection
    /// becomes a full one.
    pub fn toggled(self) -> Self {
        match self {
            Status::Checked => Status::Unchecked,
            Status::Unchecked | Status::Indeterminate => Status::Checked,
        }
    }

    pub fn aggregate(statuses: impl IntoIterator<Item = Status>) -> Option<Self> {
        statuses.into_iter().try_fold(None, |acc, status| {
            let next = match (acc, status) {
                (None, status) => status,
                (Some(current), status) if current == status => current,
                _ => return Err(Status::Indeterminate),
            };
            Ok(Some(next))
        })
        .unwrap_or_else(|indeterminate| Some(indeterminate))
    }

    /// A childless node cannot be partially selected.
    pub fn settled(self) -> Self {
        match self {
            Status::Indeterminate => Status::Unchecked,
            other => other,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "checked" | "true" => Some(Status::Checked),
            "unchecked" | "false" => Some(Status::Unchecked),
            "indeterminate" | "partial" => Some(Status::Indeterminate),
            _ => None,
        }
    }
}
