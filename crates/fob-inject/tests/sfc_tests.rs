//! Tests for merging into Vue single-file components

use fob_inject::{
    InjectError, InjectionRequest, KeyedBlock, NamespaceImports, SfcDocument, merge,
    merge_keyed_block,
};

const COMPONENT: &str = r#"<template>
  <el-button @click="save">Save</el-button>
</template>

<script>
export default {
  name: 'SaveButton',
}
</script>

<style scoped>
.button { color: red; }
</style>
"#;

#[test]
fn test_merges_into_script_and_keeps_the_rest() {
    let mut sfc = SfcDocument::new(COMPONENT);
    sfc.edit_script(|tree| {
        merge(
            tree,
            &InjectionRequest::Hook {
                name: "mounted".to_string(),
                code: "this.ready = true".to_string(),
            },
        )
    })
    .unwrap();

    let out = sfc.source();
    assert!(out.starts_with("<template>\n  <el-button @click=\"save\">Save</el-button>\n</template>\n\n<script>\n"));
    assert!(out.ends_with("</script>\n\n<style scoped>\n.button { color: red; }\n</style>\n"));
    assert!(out.contains(
        "export default {\n  name: 'SaveButton',\n  mounted() {\n    this.ready = true\n  },\n}\n"
    ));
}

#[test]
fn test_setup_block_is_skipped() {
    let source = "<script setup>\nconst n = 1\n</script>\n<script lang=\"ts\">\nexport default {}\n</script>\n";
    let mut sfc = SfcDocument::new(source);
    sfc.edit_script(|tree| {
        merge_keyed_block(
            tree,
            KeyedBlock::Data,
            &[("n".to_string(), "0".to_string())].into_iter().collect(),
        )
    })
    .unwrap();

    assert!(sfc.source().starts_with("<script setup>\nconst n = 1\n</script>\n"));
    assert!(sfc.source().contains("n: 0,"));
}

#[test]
fn test_failed_edit_keeps_document() {
    let mut sfc = SfcDocument::new(COMPONENT);
    let err = sfc
        .edit_script(|tree| {
            merge(
                tree,
                &InjectionRequest::Hook {
                    name: "mounted".to_string(),
                    code: "}".to_string(),
                },
            )
        })
        .unwrap_err();
    assert!(matches!(err, InjectError::InvalidResult { .. }));
    assert_eq!(sfc.source(), COMPONENT);
}

#[test]
fn test_template_only_component_gets_script() {
    let mut sfc = SfcDocument::new("<template><div/></template>\n");
    sfc.ensure_options_script().unwrap();
    sfc.edit_script(|tree| NamespaceImports::default().ensure_namespace_import(tree))
        .unwrap();
    assert_eq!(
        sfc.source(),
        "<template><div/></template>\n\n<script>\nimport * as Vue from 'vue';\nexport default {}\n</script>\n"
    );
}
