/// Offset used when timestamping log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Timezone {
    #[default]
    Local,
    Utc,
}
