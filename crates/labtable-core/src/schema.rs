//! Field schema: the ordered column list of one test configuration
//!
//! A schema is parsed once from a comma-separated configuration string. Every
//! name has all of its whitespace removed (not just trimmed), because the
//! lower-cased normalized name is the JSON key the backend sees. A fixed number
//! of blank slots is appended for the UI-only control columns.

/// Control slots of the test editor: play/stop cluster, remove, reorder.
pub const EDITOR_CONTROL_SLOTS: usize = 3;

/// Control slots of the log viewer: delete.
pub const LOG_VIEWER_CONTROL_SLOTS: usize = 1;

/// Column list of the test editor.
pub const DEFAULT_EDITOR_FIELDS: &str = "Start Date, Test ID, LastWaveform, Serial Number, \
     Mode (tr/pe), Channel, Channel 2,\tGain (dB),\tDelay (us),\tTime (us),Freq (MHz), Notes, \
     Filter Mode, Run (y/n)";

/// Column list of the read-only log viewer.
pub const DEFAULT_LOG_FIELDS: &str = "Start Date, Test ID, Serial Number, Mode (tr/pe), \
     Channel, Channel 2,\tGain (dB),\tDelay (us),\tTime (us),Freq (MHz), Notes";

/// Serialization key of the start date column.
pub const START_DATE_KEY: &str = "startdate";
/// Serialization key of the test id column.
pub const TEST_ID_KEY: &str = "testid";
/// Serialization key of the waveform column.
pub const WAVEFORM_KEY: &str = "lastwaveform";
/// Serialization key of the run flag.
pub const RUN_KEY: &str = "run(y/n)";
/// Serialization key of the single-shot marker.
pub const SINGLESHOT_KEY: &str = "singleshot";

/// What a column is for. Derived from the normalized field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Timestamp stamped when a run starts
    StartDate,
    /// Test identifier assigned when a run starts
    TestId,
    /// Inline sparkline of the last waveform
    Waveform,
    /// Mirrors the run state (`y`/`n`)
    RunFlag,
    /// Free-text instrument setting, editable while idle
    Data,
    /// UI-only button slot with no backend meaning
    Control,
}

impl ColumnRole {
    fn from_key(key: &str) -> Self {
        match key {
            START_DATE_KEY => ColumnRole::StartDate,
            TEST_ID_KEY => ColumnRole::TestId,
            WAVEFORM_KEY => ColumnRole::Waveform,
            RUN_KEY => ColumnRole::RunFlag,
            _ => ColumnRole::Data,
        }
    }

    /// Whether an idle row lets the operator edit this column.
    pub fn is_data(self) -> bool {
        self == ColumnRole::Data
    }
}

/// Remove every whitespace character from a field name.
///
/// `"Gain (dB)"` becomes `"Gain(dB)"`, `"Channel 2"` becomes `"Channel2"`.
pub fn normalize_field(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Ordered, normalized column names plus trailing control slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// Normalized names followed by one empty string per control slot
    fields: Vec<String>,
    /// Number of named (non-control) fields at the front of `fields`
    named: usize,
    roles: Vec<ColumnRole>,
}

impl FieldSchema {
    /// Parse a comma-separated configuration string.
    ///
    /// Names that are empty after normalization (e.g. from a trailing comma)
    /// are dropped so they cannot be confused with control slots.
    pub fn parse(config: &str, control_slots: usize) -> Self {
        let mut fields: Vec<String> = config
            .split(',')
            .map(normalize_field)
            .filter(|name| !name.is_empty())
            .collect();
        let named = fields.len();

        let mut roles: Vec<ColumnRole> = fields
            .iter()
            .map(|name| ColumnRole::from_key(&name.to_lowercase()))
            .collect();

        fields.extend(std::iter::repeat(String::new()).take(control_slots));
        roles.extend(std::iter::repeat(ColumnRole::Control).take(control_slots));

        Self {
            fields,
            named,
            roles,
        }
    }

    /// Schema of the test editor table.
    pub fn editor(config: &str) -> Self {
        Self::parse(config, EDITOR_CONTROL_SLOTS)
    }

    /// Schema of the read-only log viewer table.
    pub fn log_viewer(config: &str) -> Self {
        Self::parse(config, LOG_VIEWER_CONTROL_SLOTS)
    }

    /// Every column, control slots included (as empty names).
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Total column count, control slots included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Only the named columns, in order.
    pub fn named(&self) -> &[String] {
        &self.fields[..self.named]
    }

    pub fn named_len(&self) -> usize {
        self.named
    }

    pub fn control_slots(&self) -> usize {
        self.fields.len() - self.named
    }

    /// Header text of every column; control slots are blank.
    pub fn header_labels(&self) -> Vec<&str> {
        self.fields.iter().map(String::as_str).collect()
    }

    /// Serialization key (lower-cased name) of a named column.
    pub fn key(&self, index: usize) -> Option<String> {
        self.named().get(index).map(|name| name.to_lowercase())
    }

    /// Serialization keys of all named columns, in order.
    pub fn keys(&self) -> Vec<String> {
        self.named().iter().map(|name| name.to_lowercase()).collect()
    }

    pub fn role(&self, index: usize) -> ColumnRole {
        self.roles.get(index).copied().unwrap_or(ColumnRole::Control)
    }

    /// Case-insensitive lookup of a named column by key.
    pub fn index_of_key(&self, key: &str) -> Option<usize> {
        let key = normalize_field(key).to_lowercase();
        self.named()
            .iter()
            .position(|name| name.to_lowercase() == key)
    }

    /// First column with the given role.
    pub fn column_of(&self, role: ColumnRole) -> Option<usize> {
        self.roles.iter().position(|r| *r == role)
    }

    /// Indices of the columns an idle row may edit.
    pub fn data_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.roles
            .iter()
            .enumerate()
            .filter(|(_, role)| role.is_data())
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_removes_inner_whitespace() {
        assert_eq!(normalize_field(" Test ID "), "TestID");
        assert_eq!(normalize_field("\tGain (dB)"), "Gain(dB)");
        assert_eq!(normalize_field("Mode (tr/pe)"), "Mode(tr/pe)");
    }

    #[test]
    fn test_parse_two_fields() {
        let schema = FieldSchema::parse("Test ID, Channel", 0);
        assert_eq!(schema.named(), ["TestID", "Channel"]);
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_parse_appends_control_slots() {
        let schema = FieldSchema::editor("Test ID, Channel");
        assert_eq!(schema.len(), 5);
        assert_eq!(schema.named_len(), 2);
        assert_eq!(schema.control_slots(), EDITOR_CONTROL_SLOTS);
        assert_eq!(schema.fields()[2], "");
        assert_eq!(schema.role(4), ColumnRole::Control);
        assert_eq!(schema.header_labels(), ["TestID", "Channel", "", "", ""]);
    }

    #[test]
    fn test_default_editor_schema() {
        let schema = FieldSchema::editor(DEFAULT_EDITOR_FIELDS);
        assert_eq!(schema.named_len(), 14);
        assert_eq!(schema.len(), 17);
        assert!(schema.fields().iter().all(|f| !f.contains(char::is_whitespace)));
        assert_eq!(schema.key(0).as_deref(), Some("startdate"));
        assert_eq!(schema.key(7).as_deref(), Some("gain(db)"));
        assert_eq!(schema.key(13).as_deref(), Some("run(y/n)"));
    }

    #[test]
    fn test_roles_follow_names() {
        let schema = FieldSchema::editor(DEFAULT_EDITOR_FIELDS);
        assert_eq!(schema.role(0), ColumnRole::StartDate);
        assert_eq!(schema.role(1), ColumnRole::TestId);
        assert_eq!(schema.role(2), ColumnRole::Waveform);
        assert_eq!(schema.role(3), ColumnRole::Data);
        assert_eq!(schema.role(13), ColumnRole::RunFlag);
        assert_eq!(schema.role(14), ColumnRole::Control);
        assert_eq!(schema.role(99), ColumnRole::Control);
    }

    #[test]
    fn test_data_columns_are_contiguous_in_default_schema() {
        let schema = FieldSchema::editor(DEFAULT_EDITOR_FIELDS);
        let data: Vec<usize> = schema.data_columns().collect();
        assert_eq!(data, (3..13).collect::<Vec<_>>());
    }

    #[test]
    fn test_index_of_key_is_case_insensitive() {
        let schema = FieldSchema::editor(DEFAULT_EDITOR_FIELDS);
        assert_eq!(schema.index_of_key("SERIALNUMBER"), Some(3));
        assert_eq!(schema.index_of_key("freq(mhz)"), Some(10));
        assert_eq!(schema.index_of_key("Freq (MHz)"), Some(10));
        assert_eq!(schema.index_of_key("missing"), None);
    }

    #[test]
    fn test_trailing_comma_does_not_add_named_field() {
        let schema = FieldSchema::parse("A, B,", 1);
        assert_eq!(schema.named(), ["A", "B"]);
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_log_viewer_schema() {
        let schema = FieldSchema::log_viewer(DEFAULT_LOG_FIELDS);
        assert_eq!(schema.named_len(), 11);
        assert_eq!(schema.control_slots(), 1);
        assert_eq!(schema.column_of(ColumnRole::Waveform), None);
        assert_eq!(schema.column_of(ColumnRole::TestId), Some(1));
    }
}
