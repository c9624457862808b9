//! Mutations and mutation batches.

/// A column cell ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
    /// Write timestamp, milliseconds since the epoch
    pub timestamp: i64,
}

/// One write against a column family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Insert {
        column_family: String,
        key: Vec<u8>,
        column: Column,
    },
    SuperInsert {
        column_family: String,
        key: Vec<u8>,
        super_column: Vec<u8>,
        column: Column,
    },
    Counter {
        column_family: String,
        key: Vec<u8>,
        column: Vec<u8>,
        delta: i64,
    },
    SuperCounter {
        column_family: String,
        key: Vec<u8>,
        super_column: Vec<u8>,
        column: Vec<u8>,
        delta: i64,
    },
}

impl Mutation {
    pub fn column_family(&self) -> &str {
        match self {
            Self::Insert { column_family, .. }
            | Self::SuperInsert { column_family, .. }
            | Self::Counter { column_family, .. }
            | Self::SuperCounter { column_family, .. } => column_family,
        }
    }

    pub fn is_counter(&self) -> bool {
        matches!(self, Self::Counter { .. } | Self::SuperCounter { .. })
    }
}

/// An ordered set of mutations submitted in one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationBatch {
    mutations: Vec<Mutation>,
}

impl MutationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_insertion(&mut self, column_family: &str, key: Vec<u8>, column: Column) {
        self.mutations.push(Mutation::Insert {
            column_family: column_family.to_string(),
            key,
            column,
        });
    }

    pub fn add_super_insertion(
        &mut self,
        column_family: &str,
        key: Vec<u8>,
        super_column: Vec<u8>,
        column: Column,
    ) {
        self.mutations.push(Mutation::SuperInsert {
            column_family: column_family.to_string(),
            key,
            super_column,
            column,
        });
    }

    pub fn add_counter(&mut self, column_family: &str, key: Vec<u8>, column: Vec<u8>, delta: i64) {
        self.mutations.push(Mutation::Counter {
            column_family: column_family.to_string(),
            key,
            column,
            delta,
        });
    }

    pub fn add_super_counter(
        &mut self,
        column_family: &str,
        key: Vec<u8>,
        super_column: Vec<u8>,
        column: Vec<u8>,
        delta: i64,
    ) {
        self.mutations.push(Mutation::SuperCounter {
            column_family: column_family.to_string(),
            key,
            super_column,
            column,
            delta,
        });
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn into_mutations(self) -> Vec<Mutation> {
        self.mutations
    }
}
