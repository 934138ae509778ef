//! Python rules for both generations

use crate::rules::RuleCatalog;
use transpile_core::TranspileResult;

/// Absence/equality normalization and library calls that must run before the common renames
const PRE_COMMON: &[(&str, &str)] = &[
    (r"Array\.isArray\s*\(([^)]+)\)", "isinstance(${1}, list)"),
    (r"([^(\s]+)\s+instanceof\s+([^)\s]+)", "isinstance(${1}, ${2})"),
    (r"typeof\s+([^\s\[]+)(?:\s|\[(.+?)\])\s+===?\s+'undefined'", "${1}[${2}] is None"),
    (r"typeof\s+([^\s\[]+)(?:\s|\[(.+?)\])\s+!==?\s+'undefined'", "${1}[${2}] is not None"),
    (r"typeof\s+(\S+)\s+===?\s+'undefined'", "${1} is None"),
    (r"typeof\s+(\S+)\s+!==?\s+'undefined'", "${1} is not None"),
    (r"typeof\s+(.+?)\s+===?\s+'undefined'", "${1} is None"),
    (r"typeof\s+(.+?)\s+!==?\s+'undefined'", "${1} is not None"),
    (r"([^\s\[]+)(?:\s|\[(.+?)\])\s+===?\s+undefined", "${1}[${2}] is None"),
    (r"([^\s\[]+)(?:\s|\[(.+?)\])\s+!==?\s+undefined", "${1}[${2}] is not None"),
    (r"(\S+)\s+===?\s+undefined", "${1} is None"),
    (r"(\S+)\s+!==?\s+undefined", "${1} is not None"),
    (r"(.+?)\s+===?\s+undefined", "${1} is None"),
    (r"(.+?)\s+!==?\s+undefined", "${1} is not None"),
    (r"typeof\s+([^\s\[]+)(?:\s|\[(.+?)\])\s+===?\s+'string'", "isinstance(${1}[${2}], basestring)"),
    (r"typeof\s+([^\s\[]+)(?:\s|\[(.+?)\])\s+!==?\s+'string'", "not isinstance(${1}[${2}], basestring)"),
    (r"typeof\s+(\S+)\s+===?\s+'string'", "isinstance(${1}, basestring)"),
    (r"typeof\s+(\S+)\s+!==?\s+'string'", "not isinstance(${1}, basestring)"),
    (r"undefined", "None"),
    (r"===?", "=="),
    (r"!==?", "!="),
    (r"this\.stringToBinary\s*\((.*)\)", "${1}"),
    (r"this\.stringToBase64\s", "base64.b64encode"),
    (r"this\.binaryToBase16\s", "base64.b16encode"),
    (r"this\.base64ToBinary\s", "base64.b64decode"),
    (r"\.shift\s*\(\)", ".pop(0)"),
];

/// Control flow, operators, formatting and PEP8 spacing
const POST_COMMON: &[(&str, &str)] = &[
    (r"this\.", "self."),
    (r"([^a-zA-Z'])this([^a-zA-Z])", "${1}self${2}"),
    (r"(^|[^a-zA-Z0-9_])(?:let|const|var)\s\[\s*([^\]]+)\s\]", "${1}${2}"),
    (
        r"(^|[^a-zA-Z0-9_])(?:let|const|var)\s\{\s*([^}]+)\s\}\s=\s([^;]+)",
        "${1}${2} = (lambda ${2}: (${2}))(**${3})",
    ),
    (r"(^|[^a-zA-Z0-9_])(?:let|const|var)\s", "${1}"),
    (r"Object\.keys\s*\((.*)\)\.length", "${1}"),
    (r"Object\.keys\s*\((.*)\)", "list(${1}.keys())"),
    (r"\[([^\]]+)\]\.join\s*\(([^)]+)\)", "${2}.join([${1}])"),
    (r"hash \(([^,]+), '(sha[0-9])'", "hash(${1}, '${2}'"),
    (r"hmac \(([^,]+), ([^,]+), '(md5)'", "hmac(${1}, ${2}, hashlib.${3}"),
    (r"hmac \(([^,]+), ([^,]+), '(sha[0-9]+)'", "hmac(${1}, ${2}, hashlib.${3}"),
    (r"throw new (\S+) \((.*)\)", "raise ${1}(${2})"),
    (r"throw (\S+)", "raise ${1}"),
    (r"try \{", "try:"),
    (r"\}\s+catch \((\S+)\) \{", "except Exception as ${1}:"),
    (r"([\s(])extend(\s)", "${1}self.extend${2}"),
    (r"\} else if", "elif"),
    (r"else if", "elif"),
    (r"if\s+\((.*)\)\s+\{", "if ${1}:"),
    (r"if\s+\((.*)\)\s*\n", "if ${1}:\n"),
    (r"\}\s*else\s*\{", "else:"),
    (r"else\s*\n", "else:\n"),
    (
        r"for\s+\(([a-zA-Z0-9_]+)\s*=\s*([^;\s]+\s*);[^<>=]+(?:<=|>=|<|>)\s*(.*)\.length\s*;[^)]+\)\s*\{",
        "for ${1} in range(${2}, len(${3})):",
    ),
    (
        r"for\s+\(([a-zA-Z0-9_]+)\s*=\s*([^;\s]+\s*);[^<>=]+(?:<=|>=|<|>)\s*(.*)\s*;[^)]+\)\s*\{",
        "for ${1} in range(${2}, ${3}):",
    ),
    (r"\s\|\|\s", " or "),
    (r"\s&&\s", " and "),
    (r"!([^=])", "not ${1}"),
    (r"([^\s(]+)\.length", "len(${1})"),
    (r"\.push\s*\(([\s\S]+?)\);", ".append(${1});"),
    (r"(?m)^(\s*\}\s*$)+", ""),
    (r";(\s+?//.+?)", "${1}"),
    (r"(?m);$", ""),
    (r"\.toUpperCase\s*", ".upper"),
    (r"\.toLowerCase\s*", ".lower"),
    (r"JSON\.stringify\s*", "json.dumps"),
    (r"JSON\.parse\s*", "json.loads"),
    (r"(\S+)\.toFixed\s*\(([0-9]+)\)", "'{:.${2}f}'.format(${1})"),
    (r"(\S+)\.toFixed\s*\(([^)]+)\)", "('{:.' + str(${2}) + 'f}').format(${1})"),
    (r"parseFloat\s*", "float"),
    (r"parseInt\s*", "int"),
    (r"self\[([^\]+]+)\]", "getattr(self, ${1})"),
    (r"(\S+)\.slice \(([^,)]+),\s?([^)]+)\)", "${1}[${2}:${3}]"),
    (r"(\S+)\.slice \(([^):]+)\)", "${1}[${2}:]"),
    (r"Math\.floor\s*\(([^)]+)\)", "int(math.floor(${1}))"),
    (r"Math\.abs\s*\(([^)]+)\)", "abs(${1})"),
    (r"Math\.pow\s*\(([^)]+)\)", "math.pow(${1})"),
    (r"Math\.round\s*\(([^)]+)\)", "int(round(${1}))"),
    (r"Math\.ceil\s*\(([^)]+)\)", "int(math.ceil(${1}))"),
    (r"Math\.log", "math.log"),
    (
        r"([a-zA-Z0-9_.]*\([^)]+\)|\S+)\s*\?\s*([^:]+)\s+:\s*([^\n]+)",
        "${2} if ${1} else ${3}",
    ),
    (r"(^|\s)//", "${1}#"),
    // PEP8 E261
    (r"([^\n\s]) #", "${1}  #"),
    (r"\.indexOf", ".find"),
    (r"\strue", " True"),
    (r"\sfalse", " False"),
    (r"\((\S+)\sin\s([^)]+)\)", "(${1} in list(${2}.keys()))"),
    (r"(\S+\s*\(\))\.toString\s+\(\)", "str(${1})"),
    (r"(\S+)\.toString \(\)", "str(${1})"),
    (r"(\S+)\.join\s*\(\s*([^)\[\]]+?)\s*\)", "${2}.join(${1})"),
    (r"Math\.(max|min)\s", "${1}"),
    (r" = new ", " = "),
    (r"console\.log\s", "print"),
    (r"process\.exit\s+", "sys.exit"),
    // PEP8 E225: no whitespace before a call's parenthesis
    (r"([^:+=/*\s-]+) \(", "${1}("),
    (r"\sand\(", " and ("),
    (r"\sor\(", " or ("),
    (r"\snot\(", " not ("),
    // PEP8 E201/E202
    (r"\[ ", "["),
    (r"\{ ", "{"),
    (r"([^\s#]+) \]", "${1}]"),
    (r"([^\s#]+) \}", "${1}}"),
    // undo E225 for compound and ternary conditionals
    (r"([^a-z])(elif|if|or|else)\(", "${1}${2} ("),
    // E712
    (r"==\sTrue", "is True"),
];

/// pre + common + post, the generation 3 body catalog
pub fn python3_catalog(common: &RuleCatalog) -> TranspileResult<RuleCatalog> {
    let pre = RuleCatalog::from_table("python-pre", PRE_COMMON)?;
    let post = RuleCatalog::from_table("python-post", POST_COMMON)?;
    Ok(RuleCatalog::compose("python3", &[&pre, common, &post]))
}

/// Single post-pass over generation 3 output; strips `await` and nothing else
pub fn python2_catalog() -> TranspileResult<RuleCatalog> {
    RuleCatalog::from_table("python2", &[(r"(\s)await(\s)", "${1}")])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::common::common_catalog;
    use crate::identifiers::IdentifierRegistry;

    fn python3() -> RuleCatalog {
        let registry = IdentifierRegistry::curated().unwrap();
        python3_catalog(&common_catalog(&registry).unwrap()).unwrap()
    }

    #[test]
    fn test_absence_checks_become_identity_tests() {
        let catalog = python3();
        assert_eq!(catalog.apply("if (limit !== undefined)\n"), "if limit is not None:\n");
        assert_eq!(
            catalog.apply("        if (typeof params['type'] === 'undefined') {"),
            "        if params['type'] is None:"
        );
    }

    #[test]
    fn test_locals_and_calls() {
        let catalog = python3();
        let body = "        const id = this.safeInteger (response, 'id');";
        assert_eq!(catalog.apply(body), "        id = self.safe_integer(response, 'id')");
    }

    #[test]
    fn test_try_catch_and_raise() {
        let catalog = python3();
        let body = "        try {\n            x = 1;\n        } catch (e) {\n            throw new ExchangeError (this.id + ' failed');\n        }";
        let rendered = catalog.apply(body);
        assert!(rendered.contains("try:"));
        assert!(rendered.contains("except Exception as e:"));
        assert!(rendered.contains("raise ExchangeError(self.id + ' failed')"));
        assert!(!rendered.contains('}'));
    }

    #[test]
    fn test_for_loop_over_length() {
        let catalog = python3();
        let body = "        for (let i = 0; i < markets.length; i++) {";
        assert_eq!(catalog.apply(body), "        for i in range(0, len(markets)):");
    }

    #[test]
    fn test_python2_strips_only_await() {
        let catalog = python2_catalog().unwrap();
        let body = "        response = await self.publicGetTicker(params)\n        awaited = 1";
        assert_eq!(
            catalog.apply(body),
            "        response = self.publicGetTicker(params)\n        awaited = 1"
        );
    }
}
