//! Integration coverage for the roster session: slot loading with
//! fallbacks, debounced persistence, export/import, read-only gating, and
//! tenant isolation.

mod common {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use showroom_perf::scoreboard::{JsonSlotStore, RosterService, ScoringConfig};
    use showroom_perf::tenancy::Store;

    pub(super) const DEBOUNCE: Duration = Duration::from_millis(10);

    pub(super) fn open_service(
        data_dir: &Path,
        tenant: &str,
        read_only: bool,
    ) -> RosterService<JsonSlotStore> {
        let repository = Arc::new(JsonSlotStore::new(data_dir));
        RosterService::open(
            repository,
            Store::resolve(tenant),
            read_only,
            ScoringConfig::default(),
            DEBOUNCE,
        )
        .expect("session opens")
    }

    pub(super) fn slot_file(data_dir: &Path, slot: &str) -> std::path::PathBuf {
        data_dir.join(format!("perf_vendedores_{slot}.json"))
    }

    pub(super) fn write_slot(data_dir: &Path, slot: &str, contents: &str) {
        fs::create_dir_all(data_dir).expect("data dir");
        fs::write(slot_file(data_dir, slot), contents).expect("seed slot");
    }
}

mod loading {
    use super::common::*;
    use tempfile::tempdir;

    #[test]
    fn missing_slot_starts_with_one_default_record() {
        let dir = tempdir().expect("tempdir");
        let service = open_service(dir.path(), "toyota-morumbi", false);

        assert_eq!(service.records().len(), 1);
        assert_eq!(service.records()[0].store_label, "Toyota Morumbi");
        assert_eq!(service.records()[0].name, "");
    }

    #[test]
    fn malformed_slot_falls_back_silently() {
        let dir = tempdir().expect("tempdir");
        write_slot(dir.path(), "toyota-morumbi", "{not json");

        let service = open_service(dir.path(), "toyota-morumbi", false);
        assert_eq!(service.records().len(), 1);
        assert_eq!(service.records()[0].store_label, "Toyota Morumbi");
    }

    #[test]
    fn saved_empty_roster_stays_empty() {
        let dir = tempdir().expect("tempdir");
        write_slot(dir.path(), "toyota-morumbi", "[]");

        let service = open_service(dir.path(), "toyota-morumbi", false);
        assert!(service.records().is_empty());
    }

    #[test]
    fn unknown_tenant_gets_the_default_label_and_its_own_slot() {
        let dir = tempdir().expect("tempdir");
        let service = open_service(dir.path(), "fiat-mooca", false);
        assert_eq!(service.tenant().slot(), "fiat-mooca");
        assert_eq!(service.records()[0].store_label, "Loja Padrão");
    }
}

mod persistence {
    use super::common::*;
    use showroom_perf::scoreboard::{MetricKey, RecordField};
    use tempfile::tempdir;

    #[test]
    fn edits_reach_the_slot_after_the_session_ends() {
        let dir = tempdir().expect("tempdir");

        let id = {
            let mut service = open_service(dir.path(), "byd-ibirapuera", false);
            let record = service.create().expect("create");
            service
                .apply_edit(&record.id, RecordField::Name, "Paulo")
                .expect("edit name");
            service
                .apply_edit(&record.id, RecordField::Actual(MetricKey::Sales), "5")
                .expect("edit actual");
            record.id
        }; // drop flushes the pending debounced write

        let service = open_service(dir.path(), "byd-ibirapuera", false);
        let reloaded = service.find(&id).expect("record persisted");
        assert_eq!(reloaded.name, "Paulo");
        assert_eq!(reloaded.actuals.get(MetricKey::Sales).as_str(), "5");
    }

    #[test]
    fn removing_every_record_persists_an_empty_roster() {
        let dir = tempdir().expect("tempdir");

        {
            let mut service = open_service(dir.path(), "toyota-morumbi", false);
            let id = service.records()[0].id.clone();
            service.remove(&id).expect("remove");
        }

        let service = open_service(dir.path(), "toyota-morumbi", false);
        assert!(service.records().is_empty());
    }

    #[test]
    fn tenants_never_share_slots() {
        let dir = tempdir().expect("tempdir");

        {
            let mut morumbi = open_service(dir.path(), "toyota-morumbi", false);
            let record = morumbi.create().expect("create");
            morumbi
                .apply_edit(&record.id, RecordField::Name, "Marina")
                .expect("edit");
        }

        let nacoes = open_service(dir.path(), "toyota-nacoes", false);
        assert!(nacoes.records().iter().all(|record| record.name != "Marina"));
        assert!(slot_file(dir.path(), "toyota-morumbi").exists());
        assert!(!slot_file(dir.path(), "toyota-nacoes").exists());
    }
}

mod exchange {
    use super::common::*;
    use showroom_perf::scoreboard::{ImportError, RecordField};
    use tempfile::tempdir;

    #[test]
    fn export_import_round_trips_the_roster() {
        let dir = tempdir().expect("tempdir");
        let mut source = open_service(dir.path(), "hyundai-guarulhos", false);
        let record = source.create().expect("create");
        source
            .apply_edit(&record.id, RecordField::Name, "Aline")
            .expect("edit");
        source
            .apply_edit(&record.id, RecordField::ComplaintRating, "Ótimo")
            .expect("edit rating");

        let exported = source.export_json().expect("export");
        let originals = source.records().to_vec();

        let mut target = open_service(dir.path(), "hyundai-barra-funda", false);
        let imported = target.import_json(&exported).expect("import");

        assert_eq!(imported, originals.len());
        assert_eq!(target.records(), originals.as_slice());
    }

    #[test]
    fn export_filename_is_tenant_keyed() {
        let dir = tempdir().expect("tempdir");
        let service = open_service(dir.path(), "toyota-nacoes", false);
        assert_eq!(service.export_filename(), "performance_toyota-nacoes.json");

        let fallback = open_service(dir.path(), "", false);
        assert_eq!(fallback.export_filename(), "performance_default.json");
    }

    #[test]
    fn non_array_import_resets_to_one_default_record() {
        let dir = tempdir().expect("tempdir");
        let mut service = open_service(dir.path(), "byd-alphaville", false);
        service.create().expect("create");
        assert_eq!(service.records().len(), 2);

        let err = service
            .import_json("{\"not\": \"an array\"}")
            .expect_err("object payload rejected");
        assert!(matches!(err, ImportError::NotAnArray));
        assert_eq!(service.records().len(), 1);
        assert_eq!(service.records()[0].store_label, "BYD Alphaville");
    }

    #[test]
    fn malformed_import_resets_and_reports() {
        let dir = tempdir().expect("tempdir");
        let mut service = open_service(dir.path(), "byd-alphaville", false);

        let err = service
            .import_json("definitely not json")
            .expect_err("garbage rejected");
        assert!(matches!(err, ImportError::Parse(_)));
        assert_eq!(service.records().len(), 1);
    }

    #[test]
    fn csv_export_contains_one_row_per_record() {
        let dir = tempdir().expect("tempdir");
        let mut service = open_service(dir.path(), "toyota-morumbi", false);
        service.create().expect("create");

        let csv = service.export_csv().expect("csv export");
        let lines: Vec<&str> = csv.trim_end().lines().collect();
        assert_eq!(lines.len(), 1 + service.records().len());
        assert!(lines[0].starts_with("id,name,storeLabel"));
    }
}

mod read_only {
    use super::common::*;
    use showroom_perf::scoreboard::{RecordField, RosterServiceError};
    use tempfile::tempdir;

    #[test]
    fn mutations_are_rejected() {
        let dir = tempdir().expect("tempdir");
        let mut service = open_service(dir.path(), "toyota-morumbi", true);
        let id = service.records()[0].id.clone();

        assert!(matches!(
            service.create(),
            Err(RosterServiceError::ReadOnly)
        ));
        assert!(matches!(
            service.apply_edit(&id, RecordField::Name, "X"),
            Err(RosterServiceError::ReadOnly)
        ));
        assert!(matches!(
            service.remove(&id),
            Err(RosterServiceError::ReadOnly)
        ));
    }

    #[test]
    fn export_import_and_scoring_stay_available() {
        let dir = tempdir().expect("tempdir");
        let mut service = open_service(dir.path(), "toyota-morumbi", true);
        let id = service.records()[0].id.clone();

        service.evaluate(&id).expect("scoring is read-only");
        let exported = service.export_json().expect("export allowed");
        service
            .import_json(&exported)
            .expect("import stays available by design");
    }
}
