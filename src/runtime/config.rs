use std::env::var;
use tracing::warn;

/// Environment variable naming an extra directory to search for included files.
pub const LIB_PATH_VAR: &str = "THROF_LIB_PATH";

/// Environment variable overriding the call depth limit.
pub const MAX_DEPTH_VAR: &str = "THROF_MAX_DEPTH";

/// The source loaded before anything else, when it exists.
pub const DEFAULT_INIT_FILE: &str = "init.th4";

/// How deeply words may call each other before execution is aborted.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 4096;

/// How deeply source files may include each other.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;

/// How deeply quotations may be written inside each other.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

/// Settings for an interpreter instance.
#[derive(Clone, Debug)]
pub struct InterpreterConfig {
    /// Nesting limit for word calls and includes.
    pub max_call_depth: usize,

    /// Nesting limit for included source files.
    pub max_include_depth: usize,

    /// Nesting limit for quotation literals.
    pub max_nesting_depth: usize,

    /// Directories consulted when an included path isn't found as given.
    pub search_paths: Vec<String>,

    /// Name of the init source loaded at startup.
    pub init_file: String,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            search_paths: Vec::new(),
            init_file: DEFAULT_INIT_FILE.to_string(),
        }
    }
}

impl InterpreterConfig {
    /// The defaults, adjusted by the `THROF_LIB_PATH` and `THROF_MAX_DEPTH` environment
    /// variables when they are set.
    pub fn from_env() -> Self {
        let mut config = InterpreterConfig::default();

        if let Ok(lib_path) = var(LIB_PATH_VAR) {
            config.search_paths.push(lib_path);
        }

        if let Ok(depth) = var(MAX_DEPTH_VAR) {
            match depth.parse::<usize>() {
                Ok(depth) => config.max_call_depth = depth,
                Err(error) => warn!(
                    "Ignoring {}={}, not a valid depth: {}.",
                    MAX_DEPTH_VAR, depth, error
                ),
            }
        }

        config
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_search_path(mut self, path: &str) -> Self {
        self.search_paths.push(path.to_string());
        self
    }

    pub fn with_init_file(mut self, path: &str) -> Self {
        self.init_file = path.to_string();
        self
    }
}
