//! Integration tests for whole transpilation batches on disk

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use transpile_compiler::{TranspileConfig, TranspilePipeline};
use transpile_core::{DiagnosticKind, TranspileError};

fn exchange_source(name: &str) -> String {
    format!(
        "'use strict';

//  ---------------------------------------------------------------------------

const Exchange = require ('./base/Exchange');
const {{ ArgumentsRequired }} = require ('./base/errors');

//  ---------------------------------------------------------------------------

module.exports = class {name} extends Exchange {{
    describe () {{
        return this.deepExtend (super.describe (), {{
            'id': '{name}',
        }});
    }}

    async fetchOrderBook (symbol, limit = undefined) {{
        const response = await this.publicGetDepth (symbol);
        return this.safeInteger (response, 'id');
    }}
}};
",
        name = name
    )
}

const MANIFEST: &str = "declare module 'ccxt' {
    export class Exchange {}

    export class retired extends Exchange {}
    export class older extends Exchange {}

    export const exchanges: string[]
}
";

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn source_tree(names: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for name in names {
        write(dir.path(), &format!("js/{}.js", name), &exchange_source(name));
    }
    dir
}

fn run(root: &Path) -> Result<transpile_compiler::BatchReport, TranspileError> {
    TranspilePipeline::new(TranspileConfig::with_root(root))?.run()
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap_or_else(|e| panic!("{}: {}", relative, e))
}

#[test]
fn test_every_target_written_on_disk() {
    let dir = source_tree(&["kraken"]);
    let root = dir.path();

    let report = run(root).expect("Batch failed");
    assert_eq!(report.transpiled_count(), 1);
    assert_eq!(report.written.len(), 3);

    let php = read(root, "php/kraken.php");
    assert!(php.starts_with("<?php\n\nnamespace ccxt;\n"));
    assert!(php.contains("class kraken extends Exchange {"));
    assert!(php.contains("    public function fetch_order_book ($symbol, $limit = null) {\n"));
    assert!(php.contains("return $this->safe_integer ($response, 'id');"));

    let python3 = read(root, "python/ccxt/async_support/kraken.py");
    assert!(python3.contains("from ccxt.async_support.base.exchange import Exchange\n"));
    assert!(python3.contains("class kraken(Exchange):"));
    assert!(python3.contains("    async def fetch_order_book(self, symbol, limit=None):\n"));
    assert!(python3.contains("        response = await self.publicGetDepth(symbol)\n"));

    let python2 = read(root, "python/ccxt/kraken.py");
    assert!(python2.contains("from ccxt.base.exchange import Exchange\n"));
    assert!(python2.contains("    def fetch_order_book(self, symbol, limit=None):\n"));
    assert!(!python2.contains("await"));
}

#[test]
fn test_stale_artifacts_are_pruned() {
    let dir = source_tree(&["alpha", "beta", "gamma"]);
    let root = dir.path();
    write(root, "python/ccxt/__init__.py", "");
    write(root, "python/ccxt/exchange_helpers.py", "");
    write(root, "php/Exchange.php", "");
    write(root, "php/.gitkeep", "");

    let first = run(root).expect("First batch failed");
    assert!(root.join("php/beta.php").is_file());

    // no source named exchange_helpers
    assert_eq!(first.deleted, vec![root.join("python/ccxt/exchange_helpers.py")]);

    fs::remove_file(root.join("js/beta.js")).unwrap();
    let report = run(root).expect("Second batch failed");

    for removed in ["php/beta.php", "python/ccxt/beta.py", "python/ccxt/async_support/beta.py"] {
        assert!(!root.join(removed).exists(), "{} survived", removed);
    }
    for kept in [
        "php/alpha.php",
        "php/gamma.php",
        "python/ccxt/gamma.py",
        "python/ccxt/__init__.py",
        "php/Exchange.php",
        "php/.gitkeep",
    ] {
        assert!(root.join(kept).exists(), "{} was deleted", kept);
    }

    assert_eq!(report.deleted.len(), 3);
    assert!(report
        .diagnostics
        .diagnostics()
        .iter()
        .any(|d| matches!(&d.kind, DiagnosticKind::StaleArtifact { path } if path.ends_with("beta.php"))));
}

#[test]
fn test_pruning_can_be_disabled() {
    let dir = source_tree(&["alpha"]);
    let root = dir.path();
    write(root, "php/retired.php", "<?php\n");

    let mut config = TranspileConfig::with_root(root);
    config.prune.enabled = false;
    let report = TranspilePipeline::new(config).unwrap().run().unwrap();

    assert!(report.deleted.is_empty());
    assert!(root.join("php/retired.php").exists());
}

#[test]
fn test_manifest_declarations_are_regenerated() {
    let dir = source_tree(&["gamma", "alpha"]);
    let root = dir.path();
    write(root, "ccxt.d.ts", MANIFEST);

    run(root).expect("Batch failed");

    let manifest = read(root, "ccxt.d.ts");
    assert_eq!(
        manifest,
        "declare module 'ccxt' {
    export class Exchange {}

    export class alpha extends Exchange {}
    export class gamma extends Exchange {}

    export const exchanges: string[]
}
"
    );
}

#[test]
fn test_first_failure_stops_the_batch_without_rollback() {
    let dir = source_tree(&["alpha", "gamma"]);
    let root = dir.path();
    write(
        root,
        "js/beta.js",
        "module.exports = class beta extends Exchange {
    sign (path) {
        const url = path;

        return url;
    }
};
",
    );
    write(root, "ccxt.d.ts", MANIFEST);

    let error = run(root).unwrap_err();
    assert!(error.is_format_error());
    assert!(error.source_file().unwrap().ends_with("beta.js"));

    assert!(root.join("php/alpha.php").is_file());
    assert!(root.join("python/ccxt/alpha.py").is_file());
    assert!(!root.join("php/beta.php").exists());
    assert!(!root.join("php/gamma.php").exists());
    assert_eq!(read(root, "ccxt.d.ts"), MANIFEST);
}

#[test]
fn test_inclusion_list_limits_the_batch() {
    let dir = source_tree(&["alpha", "beta", "gamma"]);
    let root = dir.path();
    write(root, "exchanges.cfg", "# enabled exchanges\ngamma\n\nalpha\n");

    let report = run(root).expect("Batch failed");

    let names: Vec<_> = report.classes.iter().map(|(name, _)| name.to_string()).collect();
    assert_eq!(names, vec!["alpha", "gamma"]);
    assert!(!root.join("php/beta.php").exists());
}

#[test]
fn test_pattern_selects_sources() {
    let dir = source_tree(&["alpha", "beta"]);
    let root = dir.path();

    let mut config = TranspileConfig::with_root(root);
    config.pattern = "beta.js".to_string();
    let report = TranspilePipeline::new(config).unwrap().run().unwrap();

    assert_eq!(report.transpiled_count(), 1);
    assert!(report.classes.contains("beta"));
    assert!(!root.join("php/alpha.php").exists());
}

#[test]
fn test_auxiliary_outputs() {
    let dir = source_tree(&["alpha"]);
    let root = dir.path();
    write(
        root,
        "js/base/errorHierarchy.js",
        "'use strict';\n\nconst errorHierarchy = {\n    'BaseError': {\n        'ExchangeError': {},\n    },\n};\n\nmodule.exports = errorHierarchy;\n",
    );
    write(root, "python/ccxt/base/errors.py", "error_hierarchy = {\n    'Old': {},\n}\n");
    write(root, "php/base/errors.php", "<?php\n\n$error_hierarchy = array(\n    'Old' => array(),\n);\n");
    write(
        root,
        "python/test/test_async.py",
        "import asyncio\nimport ccxt.async_support as ccxt\n\n\nasync def main():\n    await exchange.load_markets()\n\nasyncio.get_event_loop().run_until_complete(main())\n",
    );

    run(root).expect("Batch failed");

    let python_errors = read(root, "python/ccxt/base/errors.py");
    assert!(python_errors.contains("'ExchangeError': {},"));
    assert!(!python_errors.contains("Old"));

    let php_errors = read(root, "php/base/errors.php");
    assert!(php_errors.contains("'ExchangeError' => array(),"));

    assert_eq!(
        read(root, "python/test/test.py"),
        "import ccxt\n\n\ndef main():\n    exchange.load_markets()\n\nmain()\n"
    );

    // fixture sources are absent, so no fixture outputs
    assert!(!root.join("python/test/test_crypto.py").exists());
}

#[test]
fn test_auxiliary_steps_can_be_disabled() {
    let dir = source_tree(&["alpha"]);
    let root = dir.path();
    write(root, "python/test/test_async.py", "import asyncio\n");

    let mut config = TranspileConfig::with_root(root);
    config.auxiliary.enabled = false;
    TranspilePipeline::new(config).unwrap().run().unwrap();

    assert!(!root.join("python/test/test.py").exists());
}

#[test]
fn test_config_file_drives_the_run() {
    let dir = source_tree(&["alpha"]);
    let root = dir.path();
    let toml = format!(
        "root = {:?}\npython2_dir = \"out/py2\"\n\n[targets]\nphp = false\n",
        root.display().to_string()
    );
    write(root, "transpile.toml", &toml);

    let config = TranspileConfig::from_file(root.join("transpile.toml")).unwrap();
    let report = TranspilePipeline::new(config).unwrap().run().unwrap();

    assert_eq!(report.written.len(), 2);
    assert!(root.join("out/py2/alpha.py").is_file());
    assert!(!root.join("php").exists());
}
