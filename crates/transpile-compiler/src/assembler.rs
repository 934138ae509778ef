//! File templates wrapping rendered methods into complete Python and PHP classes

use crate::inference::ImportSet;
use crate::renderer::RenderedMethod;

/// Banner placed at the top of every generated file, after the comment marker
pub const GENERATED_BANNER: [&str; 2] = [
    "PLEASE DO NOT EDIT THIS FILE, IT IS GENERATED AND WILL BE OVERWRITTEN:",
    "https://github.com/ccxt/ccxt/blob/master/CONTRIBUTING.md#how-to-contribute-code",
];

const PYTHON_BASESTRING_SHIM: [&str; 5] = [
    "\n# -----------------------------------------------------------------------------\n",
    "try:",
    "    basestring  # Python 3",
    "except NameError:",
    "    basestring = str  # Python 2",
];

/// The import line for a Python base class.
///
/// `ccxt.`-qualified bases import the package itself; `Exchange` lives in
/// `base.exchange`; any other base is a sibling module of the same name.
pub fn python_base_import(base_class: &str, is_async: bool) -> String {
    let package = if is_async { "ccxt.async_support" } else { "ccxt" };
    if base_class.starts_with("ccxt.") {
        return format!("import {} as ccxt", package);
    }
    let module = match base_class {
        "Exchange" => "base.exchange",
        other => other,
    };
    format!("from {}.{} import {}", package, module, base_class)
}

/// Method list as class-body lines: a blank separator, the indented signature, the body
pub fn python_methods_text(methods: &[RenderedMethod]) -> String {
    methods
        .iter()
        .flat_map(|m| [String::new(), format!("    {}", m.signature), m.body.clone()])
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn python_class(
    class_name: &str,
    base_class: &str,
    is_async: bool,
    body: &str,
    imports: &ImportSet,
) -> String {
    let mut header = vec![
        "# -*- coding: utf-8 -*-\n".to_string(),
        format!("# {}", GENERATED_BANNER[0]),
        format!("# {}\n", GENERATED_BANNER[1]),
        python_base_import(base_class, is_async),
    ];

    if body.contains("basestring") {
        header.extend(PYTHON_BASESTRING_SHIM.iter().map(|line| line.to_string()));
    }

    header.extend(imports.python_lines());
    header.push(format!("\n\nclass {}({}):", class_name, base_class));

    format!("{}\n{}\n", header.join("\n"), body)
}

pub fn php_methods_text(methods: &[RenderedMethod]) -> String {
    methods
        .iter()
        .flat_map(|m| {
            [
                String::new(),
                format!("    {}", m.signature),
                m.body.clone(),
                "    }".to_string(),
            ]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn php_class(class_name: &str, base_class: &str, body: &str) -> String {
    let header = [
        "<?php".to_string(),
        String::new(),
        "namespace ccxt;".to_string(),
        String::new(),
        format!("// {}", GENERATED_BANNER[0]),
        format!("// {}", GENERATED_BANNER[1]),
        String::new(),
        "use Exception; // a common import".to_string(),
        String::new(),
        format!("class {} extends {} {{", class_name, base_class),
    ];

    format!("{}\n{}\n}}\n", header.join("\n"), body)
}
