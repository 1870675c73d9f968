//! Unit conversion for the quantities found in laboratory oil records.
//!
//! Values pass through `uom` quantities, so every conversion is checked
//! against the dimension of the requested [`Quantity`].

use thiserror::Error;
use uom::si::{
    dynamic_viscosity::{centipoise, pascal_second, poise},
    f64::{DynamicViscosity, KinematicViscosity, MassDensity, Ratio, ThermodynamicTemperature},
    kinematic_viscosity::{centistokes, square_meter_per_second, stokes},
    mass_density::{gram_per_cubic_centimeter, kilogram_per_cubic_meter},
    ratio::{part_per_million, percent, ratio},
    thermodynamic_temperature::{degree_celsius, degree_fahrenheit, kelvin},
};

/// Physical quantities that can be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Temperature,
    Density,
    KinematicViscosity,
    DynamicViscosity,
    MassFraction,
}

impl Quantity {
    fn name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Density => "density",
            Self::KinematicViscosity => "kinematic viscosity",
            Self::DynamicViscosity => "dynamic viscosity",
            Self::MassFraction => "mass fraction",
        }
    }
}

/// Errors that may occur during unit conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("unknown {quantity} unit `{unit}`")]
    UnknownUnit {
        quantity: &'static str,
        unit: String,
    },
}

/// Converts `value` of `quantity` from one unit to another.
///
/// Unit names are matched case-insensitively, for example `"K"`, `"C"`,
/// `"kg/m^3"`, `"g/cm^3"`, `"m^2/s"`, `"cSt"`, `"kg/ms"`, `"cP"`, `"%"`, or `"ppm"`.
///
/// # Errors
///
/// Returns [`UnitError::UnknownUnit`] if either unit is not recognized for `quantity`.
pub fn convert(quantity: Quantity, from_unit: &str, to_unit: &str, value: f64) -> Result<f64, UnitError> {
    match quantity {
        Quantity::Temperature => {
            let t = temperature(from_unit, value)?;
            temperature_value(&t, to_unit)
        }
        Quantity::Density => {
            let rho = density(from_unit, value)?;
            density_value(&rho, to_unit)
        }
        Quantity::KinematicViscosity => {
            let nu = kinematic_viscosity(from_unit, value)?;
            kinematic_viscosity_value(&nu, to_unit)
        }
        Quantity::DynamicViscosity => {
            let mu = dynamic_viscosity(from_unit, value)?;
            dynamic_viscosity_value(&mu, to_unit)
        }
        Quantity::MassFraction => {
            let f = mass_fraction(from_unit, value)?;
            mass_fraction_value(&f, to_unit)
        }
    }
}

fn normalize(unit: &str) -> String {
    unit.trim()
        .to_ascii_lowercase()
        .replace(['°', ' '], "")
        .replace("**", "^")
}

fn unknown(quantity: Quantity, unit: &str) -> UnitError {
    UnitError::UnknownUnit {
        quantity: quantity.name(),
        unit: unit.to_string(),
    }
}

fn temperature(unit: &str, value: f64) -> Result<ThermodynamicTemperature, UnitError> {
    match normalize(unit).as_str() {
        "k" | "kelvin" => Ok(ThermodynamicTemperature::new::<kelvin>(value)),
        "c" | "celsius" => Ok(ThermodynamicTemperature::new::<degree_celsius>(value)),
        "f" | "fahrenheit" => Ok(ThermodynamicTemperature::new::<degree_fahrenheit>(value)),
        _ => Err(unknown(Quantity::Temperature, unit)),
    }
}

fn temperature_value(t: &ThermodynamicTemperature, unit: &str) -> Result<f64, UnitError> {
    match normalize(unit).as_str() {
        "k" | "kelvin" => Ok(t.get::<kelvin>()),
        "c" | "celsius" => Ok(t.get::<degree_celsius>()),
        "f" | "fahrenheit" => Ok(t.get::<degree_fahrenheit>()),
        _ => Err(unknown(Quantity::Temperature, unit)),
    }
}

fn density(unit: &str, value: f64) -> Result<MassDensity, UnitError> {
    match normalize(unit).as_str() {
        "kg/m^3" | "kg/m3" => Ok(MassDensity::new::<kilogram_per_cubic_meter>(value)),
        "g/cm^3" | "g/cm3" | "g/ml" => Ok(MassDensity::new::<gram_per_cubic_centimeter>(value)),
        _ => Err(unknown(Quantity::Density, unit)),
    }
}

fn density_value(rho: &MassDensity, unit: &str) -> Result<f64, UnitError> {
    match normalize(unit).as_str() {
        "kg/m^3" | "kg/m3" => Ok(rho.get::<kilogram_per_cubic_meter>()),
        "g/cm^3" | "g/cm3" | "g/ml" => Ok(rho.get::<gram_per_cubic_centimeter>()),
        _ => Err(unknown(Quantity::Density, unit)),
    }
}

fn kinematic_viscosity(unit: &str, value: f64) -> Result<KinematicViscosity, UnitError> {
    match normalize(unit).as_str() {
        "m^2/s" | "m2/s" => Ok(KinematicViscosity::new::<square_meter_per_second>(value)),
        "st" | "stokes" => Ok(KinematicViscosity::new::<stokes>(value)),
        "cst" | "centistokes" => Ok(KinematicViscosity::new::<centistokes>(value)),
        _ => Err(unknown(Quantity::KinematicViscosity, unit)),
    }
}

fn kinematic_viscosity_value(nu: &KinematicViscosity, unit: &str) -> Result<f64, UnitError> {
    match normalize(unit).as_str() {
        "m^2/s" | "m2/s" => Ok(nu.get::<square_meter_per_second>()),
        "st" | "stokes" => Ok(nu.get::<stokes>()),
        "cst" | "centistokes" => Ok(nu.get::<centistokes>()),
        _ => Err(unknown(Quantity::KinematicViscosity, unit)),
    }
}

fn dynamic_viscosity(unit: &str, value: f64) -> Result<DynamicViscosity, UnitError> {
    match normalize(unit).as_str() {
        "kg/ms" | "kg/(m.s)" | "pa.s" | "pas" => Ok(DynamicViscosity::new::<pascal_second>(value)),
        "p" | "poise" => Ok(DynamicViscosity::new::<poise>(value)),
        "cp" | "centipoise" => Ok(DynamicViscosity::new::<centipoise>(value)),
        _ => Err(unknown(Quantity::DynamicViscosity, unit)),
    }
}

fn dynamic_viscosity_value(mu: &DynamicViscosity, unit: &str) -> Result<f64, UnitError> {
    match normalize(unit).as_str() {
        "kg/ms" | "kg/(m.s)" | "pa.s" | "pas" => Ok(mu.get::<pascal_second>()),
        "p" | "poise" => Ok(mu.get::<poise>()),
        "cp" | "centipoise" => Ok(mu.get::<centipoise>()),
        _ => Err(unknown(Quantity::DynamicViscosity, unit)),
    }
}

fn mass_fraction(unit: &str, value: f64) -> Result<Ratio, UnitError> {
    match normalize(unit).as_str() {
        "1" | "fraction" => Ok(Ratio::new::<ratio>(value)),
        "%" | "percent" => Ok(Ratio::new::<percent>(value)),
        "ppm" => Ok(Ratio::new::<part_per_million>(value)),
        _ => Err(unknown(Quantity::MassFraction, unit)),
    }
}

fn mass_fraction_value(f: &Ratio, unit: &str) -> Result<f64, UnitError> {
    match normalize(unit).as_str() {
        "1" | "fraction" => Ok(f.get::<ratio>()),
        "%" | "percent" => Ok(f.get::<percent>()),
        "ppm" => Ok(f.get::<part_per_million>()),
        _ => Err(unknown(Quantity::MassFraction, unit)),
    }
}
