//! Mixed-variable cantilever beam test function

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::domain::DomainSpec;
use crate::error::Result;
use crate::functions::unsupported;
use crate::options::{Dimensionality, OptionSchema, Options, ndim_spec};
use crate::problem::Formula;
use crate::variable::VariableDescriptor;

const LOAD: f64 = 50e3;
const MODULUS: f64 = 200e9;

/// Normalized second moment of area of the 12 catalogue cross-sections.
const SECTION_INERTIA: [f64; 12] = [
    0.0833, 0.139, 0.380, 0.0796, 0.133, 0.363, 0.0859, 0.136, 0.360, 0.0922, 0.138, 0.369,
];

/// Tip deflection of a cantilever with a catalogue cross-section:
/// f = P L³ / (3 E S² Ī)
/// Variables: section (categorical, 12 levels), L in [10, 20], S in [1, 2]
#[derive(Debug, Clone, Default)]
pub struct MixedCantileverBeam;

impl MixedCantileverBeam {
    /// The only admissible dimensionality.
    pub const DIMENSIONALITY: Dimensionality = Dimensionality::Fixed(3);

    /// Mixed cantilever beam in its standard form.
    pub fn new() -> Self {
        MixedCantileverBeam
    }

    /// Declared options.
    pub fn options() -> OptionSchema {
        OptionSchema::new("MixedCantileverBeam").declare(ndim_spec(3))
    }

    /// Builds from resolved options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::DIMENSIONALITY.check("MixedCantileverBeam", options.usize("ndim")?)?;
        Ok(MixedCantileverBeam)
    }
}

/// NaN when the section column does not hold a level of `domain`.
fn deflection(row: ArrayView1<'_, f64>, domain: &DomainSpec) -> f64 {
    let Some(&inertia) = domain
        .variables()
        .first()
        .and_then(|v| v.level_index(row[0]))
        .and_then(|i| SECTION_INERTIA.get(i))
    else {
        return f64::NAN;
    };
    let (l, s) = (row[1], row[2]);
    LOAD * l.powi(3) / (3.0 * MODULUS * s * s * inertia)
}

impl Formula for MixedCantileverBeam {
    fn name(&self) -> &str {
        "MixedCantileverBeam"
    }

    fn domain(&self) -> Result<DomainSpec> {
        DomainSpec::builder()
            .variable(VariableDescriptor::categorical((1..=12).map(|i| i.to_string())))
            .variable(VariableDescriptor::continuous(10.0, 20.0))
            .variable(VariableDescriptor::continuous(1.0, 2.0))
            .build()
    }

    fn value(&self, x: ArrayView2<'_, f64>, domain: &DomainSpec) -> Array1<f64> {
        x.map_axis(Axis(1), |row| deflection(row, domain))
    }

    fn partial(
        &self,
        x: ArrayView2<'_, f64>,
        kx: usize,
        domain: &DomainSpec,
    ) -> Result<Array1<f64>> {
        match kx {
            1 => Ok(x.map_axis(Axis(1), |row| 3.0 * deflection(row, domain) / row[1])),
            2 => Ok(x.map_axis(Axis(1), |row| -2.0 * deflection(row, domain) / row[2])),
            _ => Err(unsupported(self.name(), kx)),
        }
    }
}
