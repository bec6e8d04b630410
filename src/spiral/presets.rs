use super::SpiralParameters;
use std::f64::consts::PI;

/// φ, used by several presets and the ×φ / ÷φ scale buttons
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Name reported for parameters that do not match any preset
pub const CUSTOM: &str = "Custom";

#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: String,
    pub parameters: SpiralParameters,
}

impl Preset {
    pub fn new(name: impl Into<String>, parameters: SpiralParameters) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}

/// Fixed, ordered list of named presets. The first entry is the default.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetCatalog {
    pub fn new(presets: Vec<Preset>) -> Self {
        Self { presets }
    }

    pub fn builtin() -> Self {
        let p = SpiralParameters::new;
        Self::new(vec![
            Preset::new("Divine Proportion", SpiralParameters::default()),
            Preset::new("Classic Duchamp Spiral", p(12, 25.0, 20.0, 7.5, PI / 3.0)),
            Preset::new("Golden Ratio Spiral", p(10, 20.0, 20.0 * GOLDEN_RATIO, 15.0, PI / 5.0)),
            Preset::new("Tight Hypnotic Spiral", p(20, 15.0, 8.0, 12.0, PI / 12.0)),
            Preset::new("Square Wave Pattern", p(8, 30.0, 25.0, 20.0, PI / 2.0)),
            Preset::new("Fibonacci Spiral", p(13, 13.0, 21.0, 8.0, PI / 8.0)),
            Preset::new("Pentagon Bloom", p(15, 18.0, 12.0, 10.0, (2.0 * PI) / 5.0)),
            Preset::new("Crystalline Hexagon", p(12, 22.0, 18.0, 14.0, PI / 3.0)),
            Preset::new("Whispered Spiral", p(25, 10.0, 4.0, 2.0, PI / 16.0)),
            Preset::new("Nautilus Shell", p(8, 12.0, 35.0, 25.0, PI / 4.0)),
            Preset::new("DNA Helix", p(30, 8.0, 3.0, 6.0, PI / 24.0)),
            Preset::new("Octagonal Mandala", p(16, 16.0, 14.0, 12.0, PI / 4.0)),
            Preset::new("Chaos Theory", p(24, 8.0, 7.0, 18.0, PI / 7.0)),
            Preset::new("Bauhaus Minimal", p(6, 40.0, 30.0, 5.0, PI / 6.0)),
        ])
    }

    pub fn all(&self) -> &[Preset] {
        &self.presets
    }

    pub fn default_preset(&self) -> Option<&Preset> {
        self.presets.first()
    }

    /// Exact name match first, then a case-insensitive one
    pub fn find(&self, name: &str) -> Option<&Preset> {
        let name = name.trim();
        self.presets
            .iter()
            .find(|p| p.name == name)
            .or_else(|| self.presets.iter().find(|p| p.name.eq_ignore_ascii_case(name)))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.presets.iter().position(|p| p.name == name)
    }

    /// Cycle forward like a dropdown. "Custom" (or any unknown name) starts
    /// from the top of the list.
    pub fn next_after(&self, name: &str) -> Option<&Preset> {
        if self.presets.is_empty() {
            return None;
        }
        let idx = match self.position(name) {
            Some(i) => (i + 1) % self.presets.len(),
            None => 0,
        };
        self.presets.get(idx)
    }

    pub fn prev_before(&self, name: &str) -> Option<&Preset> {
        if self.presets.is_empty() {
            return None;
        }
        let len = self.presets.len();
        let idx = match self.position(name) {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        };
        self.presets.get(idx)
    }

    /// Name of the preset with exactly these parameters, or [`CUSTOM`].
    pub fn identify(&self, parameters: &SpiralParameters) -> &str {
        self.presets
            .iter()
            .find(|p| p.parameters == *parameters)
            .map(|p| p.name.as_str())
            .unwrap_or(CUSTOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = PresetCatalog::builtin();
        assert_eq!(catalog.all().len(), 14);
        assert_eq!(catalog.default_preset().map(|p| p.name.as_str()), Some("Divine Proportion"));
        assert!(catalog.all().iter().all(|p| p.name != CUSTOM));
        assert_eq!(catalog.identify(&SpiralParameters::default()), "Divine Proportion");
    }

    #[test]
    fn test_golden_ratio_constant() {
        assert!((GOLDEN_RATIO - (1.0 + 5.0_f64.sqrt()) / 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_find_by_name() {
        let catalog = PresetCatalog::builtin();
        let duchamp = catalog.find("Classic Duchamp Spiral").map(|p| p.parameters);
        assert_eq!(duchamp, Some(SpiralParameters::new(12, 25.0, 20.0, 7.5, PI / 3.0)));
        assert!(catalog.find("dna helix").is_some());
        assert!(catalog.find("  Chaos Theory ").is_some());
        assert!(catalog.find("Nonexistent").is_none());
    }

    #[test]
    fn test_identify() {
        let catalog = PresetCatalog::builtin();
        for preset in catalog.all() {
            assert_eq!(catalog.identify(&preset.parameters), preset.name);
        }
        let tweaked = catalog.all()[3].parameters.with_number_of_circles(21);
        assert_eq!(catalog.identify(&tweaked), CUSTOM);
    }

    #[test]
    fn test_cycling() {
        let catalog = PresetCatalog::builtin();
        let first = &catalog.all()[0].name;
        let last = &catalog.all()[13].name;
        assert_eq!(catalog.next_after(last).map(|p| &p.name), Some(first));
        assert_eq!(catalog.prev_before(first).map(|p| &p.name), Some(last));
        assert_eq!(catalog.next_after(CUSTOM).map(|p| &p.name), Some(first));
        assert_eq!(catalog.prev_before(CUSTOM).map(|p| &p.name), Some(last));

        let empty = PresetCatalog::new(Vec::new());
        assert!(empty.next_after("anything").is_none());
        assert!(empty.prev_before("anything").is_none());
    }

    #[test]
    fn test_injected_catalog() {
        let catalog = PresetCatalog::new(vec![Preset::new(
            "Just One",
            SpiralParameters::new(1, 1.0, 0.0, 0.0, 0.0),
        )]);
        assert_eq!(catalog.default_preset().map(|p| p.name.as_str()), Some("Just One"));
        assert!(catalog.find("Divine Proportion").is_none());
    }
}
