use serde_json::{Map, Value};
use std::f64::consts::PI;

#[cfg(test)]
mod tests;

/// Free-form JSON configuration with dotted-path lookups.
///
/// Callers layer JSON files with [`MapConfig::deep_merge`] and single keys with
/// [`MapConfig::set_value`], then hand the result to [`GenerationConfig::from_config`]. Unknown
/// keys are kept and ignored so configs can be shared with UI collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig(Value);

impl Default for MapConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl MapConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.lookup(dotted_path)?.as_f64().filter(|v| v.is_finite())
    }

    pub fn get_usize(&self, dotted_path: &str) -> Option<usize> {
        let v = self.lookup(dotted_path)?;
        if let Some(n) = v.as_u64() {
            return usize::try_from(n).ok();
        }
        // Accept `5.0`, which JSON writers in the UI layer sometimes emit.
        let f = v.as_f64()?;
        if f.is_finite() && f >= 0.0 && f.fract() == 0.0 {
            return Some(f as usize);
        }
        None
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

/// Geometry constants for the radial placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialConstants {
    /// Lower bound of the first ring radius.
    pub min_first_radius: f64,
    /// Ring radius grows by this much per first-level sibling.
    pub radius_per_sibling: f64,
    pub corpus_wedge: f64,
    pub corpus_tag_offset: f64,
    pub taxonomy_wedge: f64,
    pub taxonomy_level2_offset: f64,
    pub taxonomy_deep_offset: f64,
    pub material_offset: f64,
    pub search_row_spacing: f64,
    pub search_row_y: f64,
}

impl Default for RadialConstants {
    fn default() -> Self {
        Self {
            min_first_radius: 300.0,
            radius_per_sibling: 60.0,
            corpus_wedge: PI,
            corpus_tag_offset: 200.0,
            taxonomy_wedge: PI / 1.5,
            taxonomy_level2_offset: 220.0,
            taxonomy_deep_offset: 180.0,
            material_offset: 150.0,
            search_row_spacing: 220.0,
            search_row_y: 300.0,
        }
    }
}

/// Typed view over the generation-related keys of a [`MapConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub max_first_level: usize,
    pub max_children_per_tag: usize,
    pub max_search_materials: usize,
    /// Material leaves under each childless tag node; `0` disables them.
    pub materials_per_tag: usize,
    pub radial: RadialConstants,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_first_level: 10,
            max_children_per_tag: 5,
            max_search_materials: 5,
            materials_per_tag: 0,
            radial: RadialConstants::default(),
        }
    }
}

impl GenerationConfig {
    /// Resolves the typed config, falling back to defaults for missing or malformed keys.
    ///
    /// Recognized keys live under `generate.*` (fan-out caps) and `radial.*` (geometry). Angles
    /// are given in radians.
    pub fn from_config(config: &MapConfig) -> Self {
        let d = Self::default();
        let r = d.radial;
        let positive = |key: &str, fallback: f64| {
            config
                .get_f64(key)
                .filter(|v| *v >= 0.0)
                .unwrap_or(fallback)
        };

        Self {
            max_first_level: config
                .get_usize("generate.maxFirstLevel")
                .unwrap_or(d.max_first_level),
            max_children_per_tag: config
                .get_usize("generate.maxChildrenPerTag")
                .unwrap_or(d.max_children_per_tag),
            max_search_materials: config
                .get_usize("generate.maxSearchMaterials")
                .unwrap_or(d.max_search_materials),
            materials_per_tag: config
                .get_usize("generate.materialsPerTag")
                .unwrap_or(d.materials_per_tag),
            radial: RadialConstants {
                min_first_radius: positive("radial.minFirstRadius", r.min_first_radius),
                radius_per_sibling: positive("radial.radiusPerSibling", r.radius_per_sibling),
                corpus_wedge: positive("radial.corpusWedge", r.corpus_wedge),
                corpus_tag_offset: positive("radial.corpusTagOffset", r.corpus_tag_offset),
                taxonomy_wedge: positive("radial.taxonomyWedge", r.taxonomy_wedge),
                taxonomy_level2_offset: positive(
                    "radial.taxonomyLevel2Offset",
                    r.taxonomy_level2_offset,
                ),
                taxonomy_deep_offset: positive("radial.taxonomyDeepOffset", r.taxonomy_deep_offset),
                material_offset: positive("radial.materialOffset", r.material_offset),
                search_row_spacing: positive("radial.searchRowSpacing", r.search_row_spacing),
                // The row may sit above the center, so negative values are allowed here.
                search_row_y: config
                    .get_f64("radial.searchRowY")
                    .unwrap_or(r.search_row_y),
            },
        }
    }
}
