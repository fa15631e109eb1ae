// Numeric core: staggered grid, pressure solve, projection, advection

pub mod actions;
pub mod advection;
pub mod fluid;
pub mod numeric;
pub mod params;
pub mod poisson;
pub mod projection;
pub mod state;

#[cfg(test)]
mod tests {
    /// Every numeric module, checked for reaches into the app layers
    const SOURCES: [(&str, &str); 8] = [
        ("actions", include_str!("sim/actions.rs")),
        ("advection", include_str!("sim/advection.rs")),
        ("fluid", include_str!("sim/fluid.rs")),
        ("numeric", include_str!("sim/numeric.rs")),
        ("params", include_str!("sim/params.rs")),
        ("poisson", include_str!("sim/poisson.rs")),
        ("projection", include_str!("sim/projection.rs")),
        ("state", include_str!("sim/state.rs")),
    ];

    #[test]
    fn test_core_stays_headless() {
        let forbidden = [
            "crate::observers",
            "crate::preprocessing",
            "crate::postprocessing",
            "crate::task",
            "plotters",
            "indicatif",
            "minifb",
        ];

        for (name, source) in SOURCES {
            for path in forbidden {
                assert!(!source.contains(path), "sim::{name} refers to {path}");
            }
        }
    }
}
