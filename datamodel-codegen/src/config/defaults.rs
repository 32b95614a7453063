//! Default configuration values - single source of truth

/// Default output directory for generated classes
pub const OUTPUT_DIR: &str = "./app/model";

/// Default namespace prefix of generated classes
pub const BASE_NAMESPACE: &str = "App\\Model";

/// Default namespace prefix stripped from file paths (none)
pub const IGNORED_NAMESPACE: &str = "";

/// Artifact kinds generated when none are requested
pub const ARTIFACTS: &[&str] = &["collection", "data", "llstorage"];

/// Default format used to serialize datetime columns
pub const DATETIME_FORMAT: &str = "Y-m-d H:i:s";

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;

/// Whether to overwrite existing files by default
pub const FORCE: bool = false;

/// Whether to print generated files to stdout by default
pub const PRINT: bool = false;

/// Interface implemented by generated data classes
pub const DATA_INTERFACE: &str = "MondayFactory\\DatabaseModel\\Data\\IDatabaseData";

/// Base class of generated collections
pub const COLLECTION_BASE: &str = "MondayFactory\\DatabaseModel\\Colection\\BaseDatabaseDataCollection";

/// Interface returned by generated collection factories
pub const COLLECTION_INTERFACE: &str =
    "MondayFactory\\DatabaseModel\\Colection\\IDatabaseDataCollection";

/// Base class of generated low-level storages
pub const STORAGE_BASE: &str =
    "MondayFactory\\DatabaseModel\\Storage\\ALowLevelRelationalDatabaseStorage";
