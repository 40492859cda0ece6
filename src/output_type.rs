/// The supported formats for the results file.
///
/// `ValueEnum` lets the CLI take this directly as a flag when the `cli` feature is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputType {
    /// One `[index] probability, flag` line per hop.
    #[default]
    Text,

    /// The whole [`crate::report::RunReport`] as one JSON document: timing, RTF, the
    /// configuration the run used, and every per-hop result.
    Json,
}
