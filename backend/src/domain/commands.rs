//! Domain-level command and result types.
//!
//! The presentation layer builds these to drive the board; they are not part
//! of the serialized DTOs in the `shared` crate.

pub mod settings {
    /// Input for adding a hero. Missing fields get the usual defaults.
    #[derive(Debug, Clone, Default)]
    pub struct AddHeroCommand {
        pub name: Option<String>,
        pub color: Option<String>,
        pub emoji: Option<String>,
    }

    /// Partial update of a hero; `None` leaves a field unchanged.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateHeroCommand {
        pub hero_id: String,
        pub name: Option<String>,
        pub color: Option<String>,
        pub emoji: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct AddQuestCommand {
        pub name: Option<String>,
        pub icon: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateQuestCommand {
        pub quest_id: String,
        pub name: Option<String>,
        pub icon: Option<String>,
    }
}

pub mod records {
    use chrono::NaiveDate;

    use crate::domain::dates::MonthKey;

    /// Something that wipes recorded progress and needs a yes from the user
    #[derive(Debug, Clone, PartialEq)]
    pub enum DestructiveAction {
        /// Clear one hero's flags on one date
        ResetHeroDay {
            hero_id: String,
            hero_name: String,
            date: NaiveDate,
        },
        /// Clear every hero's flags on one date
        ResetDay { date: NaiveDate },
        /// Clear every record of a month and its spent ledger
        ResetMonth { month: MonthKey },
    }

    /// Asks the user to approve a destructive action.
    ///
    /// Any `Fn(&DestructiveAction) -> bool` closure works as a confirmer.
    pub trait Confirmer {
        fn confirm(&self, action: &DestructiveAction) -> bool;
    }

    impl<F> Confirmer for F
    where
        F: Fn(&DestructiveAction) -> bool,
    {
        fn confirm(&self, action: &DestructiveAction) -> bool {
            self(action)
        }
    }

    /// What a reset ended up doing
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ResetOutcome {
        /// Data was removed; carries the number of stored values deleted or rewritten
        Applied { affected: usize },
        /// The user said no
        Declined,
        /// There was nothing to reset, so nobody was asked
        NothingToReset,
    }

    /// Result of pruning completion flags against the current settings
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct PruneResult {
        pub records_scanned: usize,
        pub records_rewritten: usize,
    }
}

pub mod export {
    /// Result of importing a month export
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct ImportResult {
        pub month: String,
        pub imported_days: usize,
        /// Entry keys that were not valid `YYYY-MM-DD` dates or fell outside `month`
        pub skipped_keys: Vec<String>,
    }
}
