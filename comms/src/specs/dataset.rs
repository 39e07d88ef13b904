wire_enum! {
    /// The sample datasets the backend can serve.
    pub enum DatasetSelection {
        /// Titanic passenger list.
        Titanic => "titanic",
        /// LEGO set catalog.
        Lego => "lego",
        /// House sale records.
        House => "house",
    }
}

impl Default for DatasetSelection {
    fn default() -> Self {
        Self::Titanic
    }
}

wire_enum! {
    /// The kind of problem the preprocessing step derived from the target.
    pub enum ProblemKind {
        Regression => "regression",
        Classification => "classification",
    }
}

impl Default for ProblemKind {
    fn default() -> Self {
        Self::Regression
    }
}
