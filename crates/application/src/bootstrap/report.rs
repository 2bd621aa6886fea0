/// What the schema initializer did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOutcome {
    /// False when the collection already existed
    pub collection_created: bool,
    /// Ensured index names, in definition order
    pub indexes: Vec<String>,
}

/// Summary of one bootstrap run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub database: String,
    pub collection: String,
    pub schema: SchemaOutcome,
    /// Documents inserted by the seed loader in this run
    pub inserted: u64,
    /// Documents in the collection once the run finished
    pub total_documents: u64,
}

impl std::fmt::Display for BootstrapReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}: collection {}, {} indexes, {} inserted, {} total",
            self.database,
            self.collection,
            if self.schema.collection_created {
                "created"
            } else {
                "existing"
            },
            self.schema.indexes.len(),
            self.inserted,
            self.total_documents
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_display() {
        let report = BootstrapReport {
            database: "cragcrowd".to_string(),
            collection: "sensor_readings".to_string(),
            schema: SchemaOutcome {
                collection_created: true,
                indexes: vec!["wall_id_1".to_string()],
            },
            inserted: 3,
            total_documents: 3,
        };

        assert_eq!(
            report.to_string(),
            "cragcrowd.sensor_readings: collection created, 1 indexes, 3 inserted, 3 total"
        );
    }
}
