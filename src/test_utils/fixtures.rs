use std::path::PathBuf;

use tempfile::TempDir;

/// Small KOSPI/KOSDAQ universe in TOML, revenue in KRW.
pub const SAMPLE_UNIVERSE: &str = r#"
[[candidates]]
id = "005930"
name = "Samsung Electronics"
market = "KOSPI"
stock_code = "005930"
keywords = ["semiconductor", "memory", "mobile", "display"]
scale = 258900000000000.0

[[candidates]]
id = "000660"
name = "SK Hynix"
market = "KOSPI"
stock_code = "000660"
keywords = ["semiconductor", "memory", "dram", "nand"]
scale = 162000000000000.0

[[candidates]]
id = "042700"
name = "Hanmi Semiconductor"
market = "KOSPI"
keywords = ["semiconductor", "equipment", "bonder"]
scale = 560000000000.0

[[candidates]]
id = "058470"
name = "Leeno Industrial"
market = "KOSDAQ"
keywords = ["semiconductor", "test", "socket"]
scale = 250000000000.0

[[candidates]]
id = "035420"
name = "NAVER"
market = "KOSPI"
keywords = ["platform", "search", "cloud", "webtoon"]
scale = 9670000000000.0

[[candidates]]
id = "000270"
name = "Kia"
market = "KOSPI"
keywords = ["auto", "vehicle", "ev"]
scale = 99800000000000.0

[[candidates]]
id = "900001"
name = "Broken Filing Co"
market = "KOSDAQ"
keywords = ["semiconductor"]
extraction_error = "income statement table missing"
"#;

/// Golden sets for the sample universe.
pub const SAMPLE_GOLDEN: &str = r#"
[[sets]]
id = "samsung-core"
target_label = "Samsung Electronics"
target_id = "005930"
created_at = "2024-05-01T09:00:00Z"

[[sets.peers]]
id = "000660"
name = "SK Hynix"

[[sets.peers]]
id = "066570"
name = "LG Electronics"

[[sets]]
id = "virtual-fab"
target_label = "Virtual - Fab startup"

[[sets.peers]]
id = "042700"

[[sets.peers]]
id = "058470"
"#;

/// Test fixture providing isolated filesystem environment.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTestFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {data_path:?}");

        Self {
            temp_dir,
            data_path,
        }
    }

    /// Create a test file with content.
    #[must_use]
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Write the sample universe and golden sets under the fixture root.
    #[must_use]
    pub fn with_sample_data(self) -> Self {
        let _ = self.create_file("universe.toml", SAMPLE_UNIVERSE);
        let _ = self.create_file("golden.toml", SAMPLE_GOLDEN);
        self
    }
}

impl Drop for UnitTestFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.data_path);
    }
}
