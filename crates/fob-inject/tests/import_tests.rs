//! Tests for framework binding lookup and import merging

use fob_inject::{
    InjectConfig, LookupFailure, MergeOutcome, NamespaceImports, ParseOptions, ScriptTree,
    ensure_named_import,
};

fn tree(source: &str) -> ScriptTree {
    ScriptTree::parse(source, ParseOptions::default()).unwrap()
}

#[test]
fn test_binding_name_from_default_import() {
    let t = tree("import V from 'vue';\nexport default {}\n");
    assert_eq!(NamespaceImports::default().binding_name(&t), "V");
}

#[test]
fn test_binding_name_from_namespace_import() {
    let t = tree("import * as Framework from \"vue\";\n");
    assert_eq!(NamespaceImports::default().binding_name(&t), "Framework");
}

#[test]
fn test_binding_name_falls_back() {
    let t = tree("import { ref } from 'vue';\nimport Other from 'other';\n");
    let imports = NamespaceImports::default();
    assert_eq!(imports.lookup(&t), Err(LookupFailure::NoImport));
    assert_eq!(imports.binding_name(&t), "Vue");
}

#[test]
fn test_binding_name_uses_configured_default() {
    let config = InjectConfig {
        namespace_name: "V3".to_string(),
        ..InjectConfig::default()
    };
    let t = tree("export default {}\n");
    assert_eq!(config.namespace_imports().binding_name(&t), "V3");
}

#[test]
fn test_default_import_becomes_namespace_import() {
    let mut t = tree("import Vue from 'vue';\nexport default {}\n");
    let outcome = NamespaceImports::default()
        .ensure_namespace_import(&mut t)
        .unwrap();
    assert_eq!(outcome, MergeOutcome::Extended);
    assert_eq!(t.source(), "import * as Vue from 'vue';\nexport default {}\n");
}

#[test]
fn test_rewrite_keeps_local_name() {
    let mut t = tree("import MyVue from \"vue\"\n");
    NamespaceImports::default()
        .ensure_namespace_import(&mut t)
        .unwrap();
    assert_eq!(t.source(), "import * as MyVue from \"vue\"\n");
}

#[test]
fn test_namespace_import_added_when_missing() {
    let mut t = tree("import { ref } from 'vue';\nexport default {}\n");
    let outcome = NamespaceImports::default()
        .ensure_namespace_import(&mut t)
        .unwrap();
    assert_eq!(outcome, MergeOutcome::Created);
    assert_eq!(
        t.source(),
        "import * as Vue from 'vue';\nimport { ref } from 'vue';\nexport default {}\n"
    );
}

#[test]
fn test_existing_namespace_import_is_left_alone() {
    let source = "import * as V from 'vue';\nexport default {}\n";
    let mut t = tree(source);
    let outcome = NamespaceImports::default()
        .ensure_namespace_import(&mut t)
        .unwrap();
    assert_eq!(outcome, MergeOutcome::Unchanged);
    assert_eq!(t.source(), source);
}

#[test]
fn test_named_import_prepended_then_extended() {
    let mut t = tree("export default {}\n");

    let outcome = ensure_named_import(&mut t, "$on", "./gogocodeTransfer").unwrap();
    assert_eq!(outcome, MergeOutcome::Created);
    assert_eq!(
        t.source(),
        "import { $on } from './gogocodeTransfer';\nexport default {}\n"
    );

    let outcome = ensure_named_import(&mut t, "$on", "./gogocodeTransfer").unwrap();
    assert_eq!(outcome, MergeOutcome::Unchanged);

    ensure_named_import(&mut t, "$off", "./gogocodeTransfer").unwrap();
    assert_eq!(
        t.source(),
        "import { $on, $off } from './gogocodeTransfer';\nexport default {}\n"
    );
}
