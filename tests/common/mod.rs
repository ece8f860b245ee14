#![allow(dead_code)]

pub mod temp_files {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Directory holding one route table; removed on drop
    pub struct TempTable {
        pub dir: tempfile::TempDir,
        pub path: PathBuf,
    }

    impl TempTable {
        pub fn write(&self, content: &str) {
            std::fs::write(&self.path, content).unwrap();
        }
    }

    /// Write `content` to a uniquely named table file with extension `ext`
    pub fn create_temp_table(content: &str, ext: &str) -> TempTable {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!(
            "brrtm_test_{}_{}_{}.{}",
            std::process::id(),
            counter,
            nanos,
            ext
        ));
        std::fs::write(&path, content).unwrap();
        TempTable { dir, path }
    }

    pub fn create_temp_yaml(content: &str) -> TempTable {
        create_temp_table(content, "yaml")
    }

    pub fn create_temp_json(content: &str) -> TempTable {
        create_temp_table(content, "json")
    }

    pub fn create_temp_toml(content: &str) -> TempTable {
        create_temp_table(content, "toml")
    }
}
