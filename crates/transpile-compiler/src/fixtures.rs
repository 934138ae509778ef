//! One-off transpilations that run after the class batch: the error hierarchy
//! splice and the shared test fixtures

use crate::config::AuxiliarySettings;
use crate::decomposer::StructuralDecomposer;
use crate::files;
use crate::renderer::{PhpRenderer, PythonRenderer};
use crate::rules::RuleCatalog;
use regex::Regex;
use std::path::{Path, PathBuf};
use transpile_core::{Diagnostic, TranspileResult};

const PYTHON_PREAMBLE: &[&str] = &[
    "import os",
    "import sys",
    "",
    "root = os.path.dirname(os.path.dirname(os.path.abspath(__file__)))",
    "sys.path.append(root)",
    "",
    "# ----------------------------------------------------------------------------",
    "",
    "# PLEASE DO NOT EDIT THIS FILE, IT IS GENERATED AND WILL BE OVERWRITTEN:",
    "# https://github.com/ccxt/ccxt/blob/master/CONTRIBUTING.md#how-to-contribute-code",
    "",
    "# ----------------------------------------------------------------------------",
    "",
];

const PHP_PREAMBLE: &[&str] = &[
    "<?php",
    "namespace ccxt;",
    "include_once (__DIR__.'/../../ccxt.php');",
    "// ----------------------------------------------------------------------------",
    "",
    "// PLEASE DO NOT EDIT THIS FILE, IT IS GENERATED AND WILL BE OVERWRITTEN:",
    "// https://github.com/ccxt/ccxt/blob/master/CONTRIBUTING.md#how-to-contribute-code",
    "",
    "// -----------------------------------------------------------------------------",
    "",
];

const USE_STRICT: (&str, &str) = (r"'use strict';?\s+", "");
const REQUIRE_LINES: (&str, &str) = (r"[^\n]+require[^\n]+\n", "");

/// A canonical test file rendered into a Python and a PHP fixture
#[derive(Debug, Clone, Copy)]
pub struct FixtureSpec {
    pub source: &'static str,
    pub python_output: &'static str,
    pub php_output: &'static str,
    prefilters: &'static [(&'static str, &'static str)],
    python_header: &'static [&'static str],
    php_header: &'static [&'static str],
}

pub const PRECISION_FIXTURE: FixtureSpec = FixtureSpec {
    source: "test.number.js",
    python_output: "test_decimal_to_precision.py",
    php_output: "decimal_to_precision.php",
    prefilters: &[
        USE_STRICT,
        REQUIRE_LINES,
        ("decimalToPrecision", "decimal_to_precision"),
        ("numberToString", "number_to_string"),
    ],
    python_header: &[
        "",
        "from ccxt.base.decimal_to_precision import decimal_to_precision  # noqa F401",
        "from ccxt.base.decimal_to_precision import TRUNCATE              # noqa F401",
        "from ccxt.base.decimal_to_precision import ROUND                 # noqa F401",
        "from ccxt.base.decimal_to_precision import DECIMAL_PLACES        # noqa F401",
        "from ccxt.base.decimal_to_precision import SIGNIFICANT_DIGITS    # noqa F401",
        "from ccxt.base.decimal_to_precision import TICK_SIZE             # noqa F401",
        "from ccxt.base.decimal_to_precision import PAD_WITH_ZERO         # noqa F401",
        "from ccxt.base.decimal_to_precision import NO_PADDING            # noqa F401",
        "from ccxt.base.decimal_to_precision import number_to_string      # noqa F401",
        "",
        "# ----------------------------------------------------------------------------",
        "",
        "",
    ],
    php_header: &[
        "// testDecimalToPrecisionErrorHandling",
        "//",
        r"// $this->expectException ('ccxt\\BaseError');",
        "// $this->expectExceptionMessageRegExp ('/Negative precision is not yet supported/');",
        "// Exchange::decimalToPrecision ('123456.789', TRUNCATE, -2, DECIMAL_PLACES);",
        "//",
        r"// $this->expectException ('ccxt\\BaseError');",
        "// $this->expectExceptionMessageRegExp ('/Invalid number/');",
        "// Exchange::decimalToPrecision ('foo');",
        "",
        "// ----------------------------------------------------------------------------",
        "",
        "function decimal_to_precision ($x, $roundingMode = ROUND, $numPrecisionDigits = null, $countingMode = DECIMAL_PLACES, $paddingMode = NO_PADDING) {",
        "    return Exchange::decimal_to_precision ($x, $roundingMode, $numPrecisionDigits, $countingMode, $paddingMode);",
        "}",
        "function number_to_string ($x) {",
        "    return Exchange::number_to_string ($x);",
        "}",
        "",
    ],
};

pub const DATETIME_FIXTURE: FixtureSpec = FixtureSpec {
    source: "test.datetime.js",
    python_output: "test_exchange_datetime_functions.py",
    php_output: "test_exchange_datetime_functions.php",
    prefilters: &[REQUIRE_LINES, (r"(?m)^/\*.*\s+", "")],
    python_header: &[
        "",
        "import ccxt  # noqa: F402",
        "from ccxt.base.decimal_to_precision import ROUND_UP, ROUND_DOWN  # noqa F401",
        "",
        "# ----------------------------------------------------------------------------",
        "",
        "",
    ],
    php_header: &[],
};

pub const CRYPTO_FIXTURE: FixtureSpec = FixtureSpec {
    source: "test.crypto.js",
    python_output: "test_crypto.py",
    php_output: "test_crypto.php",
    prefilters: &[
        USE_STRICT,
        REQUIRE_LINES,
        (r"function equals \([\S\s]+?return true\n\}\n", ""),
    ],
    python_header: &[
        "",
        "import ccxt  # noqa: F402",
        "",
        "Exchange = ccxt.Exchange",
        "hash = Exchange.hash",
        "ecdsa = Exchange.ecdsa",
        "jwt = Exchange.jwt",
        "encode = Exchange.encode",
        "",
        "",
        "def equals(a, b):",
        "    return a == b",
        "",
    ],
    php_header: &[
        "",
        "function hash(...$args) {",
        "    return Exchange::hash(...$args);",
        "}",
        "",
        "function encode(...$args) {",
        "    return Exchange::encode(...$args);",
        "}",
        "",
        "function ecdsa(...$args) {",
        "    return Exchange::ecdsa(...$args);",
        "}",
        "",
        "function jwt(...$args) {",
        "    return Exchange::jwt(...$args);",
        "}",
        "",
        "function equals($a, $b) {",
        "    return $a === $b;",
        "}",
    ],
};

pub const FIXTURES: [FixtureSpec; 3] = [PRECISION_FIXTURE, DATETIME_FIXTURE, CRYPTO_FIXTURE];

/// Python and PHP text rendered from one fragment of canonical source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentOutput {
    pub python3: String,
    pub python2: String,
    pub php: String,
}

/// Renders free-standing source fragments through the same catalogs as classes
pub struct FragmentTranspiler<'a> {
    python: &'a PythonRenderer,
    php: &'a PhpRenderer,
    decomposer: &'a StructuralDecomposer,
}

impl<'a> FragmentTranspiler<'a> {
    pub fn new(python: &'a PythonRenderer, php: &'a PhpRenderer, decomposer: &'a StructuralDecomposer) -> Self {
        Self {
            python,
            php,
            decomposer,
        }
    }

    /// Render a fragment; PHP variables are the fragment's own locals and catch bindings.
    /// Nesting overflows come back as diagnostics against `origin`.
    pub fn transpile(
        &self,
        origin: &str,
        js: &str,
        remove_empty_lines: bool,
    ) -> TranspileResult<(FragmentOutput, Vec<Diagnostic>)> {
        let python3 = self.python.transpile_python3(js, None, remove_empty_lines);
        let python2 = self.python.derive_python2(&python3);

        let bindings = self.decomposer.collect_bindings(&[], js);
        let (php, overflows) = self.php.transpile_php(js, &bindings)?;
        let diagnostics = overflows
            .into_iter()
            .map(|overflow| {
                log::warn!("{}: collection literal left unconverted: {}", origin, overflow.line);
                Diagnostic::nesting_bound_exceeded(overflow.line).in_file(origin)
            })
            .collect();

        Ok((
            FragmentOutput {
                python3,
                python2,
                php,
            },
            diagnostics,
        ))
    }

    /// Transpile the error hierarchy definition and splice it into both error modules
    pub fn transpile_error_hierarchy(&self, root: &Path, settings: &AuxiliarySettings) -> TranspileResult<Vec<Diagnostic>> {
        let source = root.join(&settings.error_hierarchy_source);
        let js = files::read_file(&source)?;
        let js = Regex::new(r"(?s)module\.exports = [^;]+;\n")?
            .replace_all(&js, "")
            .trim()
            .to_string();

        let origin = source.display().to_string();
        let (output, diagnostics) = self.transpile(&origin, &js, false)?;

        let python_errors = root.join(&settings.python_errors);
        log::info!("Transpiling error hierarchy → {}", python_errors.display());
        files::replace_in_file(&python_errors, &Regex::new(r"(?s)error_hierarchy = .+?\n\}")?, &output.python3)?;

        let php_errors = root.join(&settings.php_errors);
        log::info!("Transpiling error hierarchy → {}", php_errors.display());
        files::replace_in_file(&php_errors, &Regex::new(r"(?s)\$error_hierarchy = .+?\n\);")?, &output.php)?;

        Ok(diagnostics)
    }

    /// Render one test fixture into its Python (generation 2) and PHP files
    pub fn transpile_fixture(
        &self,
        fixture: &FixtureSpec,
        root: &Path,
        settings: &AuxiliarySettings,
    ) -> TranspileResult<(Vec<PathBuf>, Vec<Diagnostic>)> {
        let source = root.join(&settings.fixture_dir).join(fixture.source);
        log::info!("Transpiling from {}", source.display());

        let prefilters = RuleCatalog::from_table(fixture.source, fixture.prefilters)?;
        let js = prefilters.apply(&files::read_file(&source)?);
        let (output, diagnostics) = self.transpile(&source.display().to_string(), &js, false)?;

        let python_path = root.join(&settings.python_test_dir).join(fixture.python_output);
        let python = format!(
            "{}{}{}",
            PYTHON_PREAMBLE.join("\n"),
            fixture.python_header.join("\n"),
            output.python2
        );

        let php_path = root.join(&settings.php_test_dir).join(fixture.php_output);
        let php = format!("{}{}{}", PHP_PREAMBLE.join("\n"), fixture.php_header.join("\n"), output.php);

        for (path, text) in [(&python_path, &python), (&php_path, &php)] {
            log::info!("→ {}", path.display());
            files::overwrite_file(path, text)?;
        }

        Ok((vec![python_path, php_path], diagnostics))
    }
}
