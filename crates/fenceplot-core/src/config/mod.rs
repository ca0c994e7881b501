use serde_json::{Map, Value, json};

/// Fallback axis domain used whenever a payload omits one or supplies an invalid one.
pub const DEFAULT_DOMAIN: [f64; 2] = [-10.0, 10.0];
pub const DEFAULT_PAN_STEP: f64 = 0.05;

/// Site-wide rendering configuration.
///
/// Stored as a JSON object and addressed with dotted paths (`board.zoom.factorX`), so hosts can
/// pass overrides straight from their own JSON/YAML settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig(Value);

impl Default for SiteConfig {
    fn default() -> Self {
        Self(json!({
            "plot": {
                "defaultDomain": DEFAULT_DOMAIN,
            },
            "surface": {
                "defaultWidth": 500.0,
                "defaultHeight": 350.0,
                "minWidth": 300.0,
            },
            "board": {
                "axis": true,
                "keepAspectRatio": false,
                "showCopyright": false,
                "keyboardPanStep": DEFAULT_PAN_STEP,
                "pan": { "enabled": true, "needShift": false },
                "zoom": { "factorX": 1.25, "factorY": 1.25, "wheel": true, "needShift": false },
            },
        }))
    }
}

impl SiteConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64().filter(|v| v.is_finite())
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // `from_value` accepts any JSON value; coerce non-objects so this never panics.
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

    /// The configured fallback domain, or [`DEFAULT_DOMAIN`] if the override is unusable.
    pub fn default_domain(&self) -> [f64; 2] {
        self.get("plot.defaultDomain")
            .and_then(crate::plot::domain_from_value)
            .unwrap_or(DEFAULT_DOMAIN)
    }

    pub fn surface_min_width(&self) -> f64 {
        self.get_f64("surface.minWidth").unwrap_or(300.0).max(1.0)
    }

    pub fn surface_default_width(&self) -> f64 {
        self.get_f64("surface.defaultWidth").unwrap_or(500.0)
    }

    pub fn surface_default_height(&self) -> f64 {
        self.get_f64("surface.defaultHeight").unwrap_or(350.0)
    }

    /// Fraction of the visible span one arrow key press pans by. Non-positive overrides are
    /// ignored.
    pub fn keyboard_pan_step(&self) -> f64 {
        self.get_f64("board.keyboardPanStep")
            .filter(|v| *v > 0.0)
            .unwrap_or(DEFAULT_PAN_STEP)
    }

    /// Fence tag routed to the interactive board, if the host opted in.
    pub fn board_fence_tag(&self) -> Option<&str> {
        self.get_str("board.fenceTag").filter(|t| !t.is_empty())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_expose_surface_and_board_settings() {
        let cfg = SiteConfig::default();
        assert_eq!(cfg.default_domain(), [-10.0, 10.0]);
        assert_eq!(cfg.surface_min_width(), 300.0);
        assert_eq!(cfg.surface_default_height(), 350.0);
        assert_eq!(cfg.get_f64("board.zoom.factorX"), Some(1.25));
        assert_eq!(cfg.get_bool("board.pan.enabled"), Some(true));
        assert_eq!(cfg.board_fence_tag(), None);
    }

    #[test]
    fn deep_merge_keeps_sibling_keys() {
        let mut cfg = SiteConfig::default();
        cfg.deep_merge(&json!({ "board": { "zoom": { "factorX": 2.0 } } }));
        assert_eq!(cfg.get_f64("board.zoom.factorX"), Some(2.0));
        assert_eq!(cfg.get_f64("board.zoom.factorY"), Some(1.25));
    }

    #[test]
    fn invalid_domain_override_falls_back() {
        let mut cfg = SiteConfig::default();
        cfg.set_value("plot.defaultDomain", json!([5, 1]));
        assert_eq!(cfg.default_domain(), DEFAULT_DOMAIN);
    }

    #[test]
    fn keyboard_pan_step_ignores_non_positive_overrides() {
        let mut cfg = SiteConfig::default();
        assert_eq!(cfg.keyboard_pan_step(), DEFAULT_PAN_STEP);
        cfg.set_value("board.keyboardPanStep", json!(0.2));
        assert_eq!(cfg.keyboard_pan_step(), 0.2);
        cfg.set_value("board.keyboardPanStep", json!(-1));
        assert_eq!(cfg.keyboard_pan_step(), DEFAULT_PAN_STEP);
        cfg.set_value("board.keyboardPanStep", json!("fast"));
        assert_eq!(cfg.keyboard_pan_step(), DEFAULT_PAN_STEP);
    }

    #[test]
    fn set_value_coerces_non_object_root() {
        let mut cfg = SiteConfig::from_value(json!(42));
        cfg.set_value("board.fenceTag", json!("jessecode"));
        assert_eq!(cfg.board_fence_tag(), Some("jessecode"));
    }
}
