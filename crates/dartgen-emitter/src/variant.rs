//! Storage-variant configuration.
//!
//! Each variant bundles every name and annotation string the generator needs
//! as one immutable value, so the transform itself is variant-agnostic.

/// The two supported storage bindings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Variant {
    ObjectBox,
    Hive,
}

/// Naming and annotation conventions for one storage binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantConfig {
    /// Prepended to the original class name (`ObjectBoxItem`).
    pub class_prefix: &'static str,
    /// Secondary extension of generated and include files (`item.ob.dart`).
    pub file_tag: &'static str,
    /// The binding library import.
    pub binding_import: &'static str,
    /// The shared base-model package import.
    pub base_model_import: &'static str,
    /// Parameterized base class name (`ObjectBoxModel<Item>`).
    pub base_class: &'static str,
    /// Class-level entity marker.
    pub entity_annotation: &'static str,
    /// Annotation on the synthetic identifier field.
    pub id_annotation: &'static str,
    /// Name of the synthetic identifier field.
    pub id_field: &'static str,
    /// Storage "as date" annotation for date-typed fields.
    pub date_annotation: &'static str,
    /// Unique, replace-on-conflict annotation.
    pub unique_annotation: &'static str,
}

static OBJECTBOX: VariantConfig = VariantConfig {
    class_prefix: "ObjectBox",
    file_tag: "ob",
    binding_import: "package:objectbox/objectbox.dart",
    base_model_import: "package:repository_ob/objectbox_model.dart",
    base_class: "ObjectBoxModel",
    entity_annotation: "@Entity()",
    id_annotation: "@Id()",
    id_field: "objectBoxId",
    date_annotation: "@Property(type: PropertyType.date)",
    unique_annotation: "@Unique(onConflict: ConflictStrategy.replace)",
};

static HIVE: VariantConfig = VariantConfig {
    class_prefix: "Hive",
    file_tag: "hive",
    binding_import: "package:hive/hive.dart",
    base_model_import: "package:repository_hive/hive_model.dart",
    base_class: "HiveModel",
    entity_annotation: "@HiveType(typeId: 0)",
    id_annotation: "@HiveField(0)",
    id_field: "hiveId",
    date_annotation: "@HiveDateTime()",
    unique_annotation: "@HiveUnique()",
};

impl Variant {
    pub fn config(self) -> &'static VariantConfig {
        match self {
            Variant::ObjectBox => &OBJECTBOX,
            Variant::Hive => &HIVE,
        }
    }

    /// The secondary extension used for generated output files.
    pub fn file_tag(self) -> &'static str {
        self.config().file_tag
    }
}
