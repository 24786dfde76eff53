use serde::Serialize;

use crate::index_newtype;

index_newtype!(VehicleIdx, Vehicle);

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Vehicle {
    external_id: u32,
    speed: f64,
    max_fuel: f64,
    min_fuel: f64,
    capacity: f64,
    base_consumption: f64,
    payload_coefficient: f64,
    refueling_time: f64,
    refueling_cost: f64,
}

impl Vehicle {
    pub fn external_id(&self) -> u32 {
        self.external_id
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn max_fuel(&self) -> f64 {
        self.max_fuel
    }

    pub fn min_fuel(&self) -> f64 {
        self.min_fuel
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn refueling_time(&self) -> f64 {
        self.refueling_time
    }

    pub fn refueling_cost(&self) -> f64 {
        self.refueling_cost
    }

    /// Energy drawn over one edge. Payload is the route's total demand, not
    /// the remaining on-board load (preserved behavior of the published
    /// algorithm).
    pub fn energy_consumption(&self, distance: f64, payload: f64) -> f64 {
        distance * (self.base_consumption + payload * self.payload_coefficient)
    }
}

pub struct VehicleBuilder {
    external_id: u32,
    speed: Option<f64>,
    max_fuel: Option<f64>,
    min_fuel: Option<f64>,
    capacity: Option<f64>,
    base_consumption: Option<f64>,
    payload_coefficient: Option<f64>,
    refueling_time: Option<f64>,
    refueling_cost: Option<f64>,
}

impl VehicleBuilder {
    pub fn new(external_id: u32) -> VehicleBuilder {
        VehicleBuilder {
            external_id,
            speed: None,
            max_fuel: None,
            min_fuel: None,
            capacity: None,
            base_consumption: None,
            payload_coefficient: None,
            refueling_time: None,
            refueling_cost: None,
        }
    }

    pub fn set_speed(&mut self, speed: f64) -> &mut VehicleBuilder {
        self.speed = Some(speed);
        self
    }

    pub fn set_fuel_range(&mut self, min_fuel: f64, max_fuel: f64) -> &mut VehicleBuilder {
        self.min_fuel = Some(min_fuel);
        self.max_fuel = Some(max_fuel);
        self
    }

    pub fn set_capacity(&mut self, capacity: f64) -> &mut VehicleBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_base_consumption(&mut self, base_consumption: f64) -> &mut VehicleBuilder {
        self.base_consumption = Some(base_consumption);
        self
    }

    pub fn set_payload_coefficient(&mut self, payload_coefficient: f64) -> &mut VehicleBuilder {
        self.payload_coefficient = Some(payload_coefficient);
        self
    }

    pub fn set_refueling_time(&mut self, refueling_time: f64) -> &mut VehicleBuilder {
        self.refueling_time = Some(refueling_time);
        self
    }

    pub fn set_refueling_cost(&mut self, refueling_cost: f64) -> &mut VehicleBuilder {
        self.refueling_cost = Some(refueling_cost);
        self
    }

    pub fn build(self) -> Vehicle {
        Vehicle {
            external_id: self.external_id,
            speed: self.speed.unwrap_or(50.0),
            max_fuel: self.max_fuel.unwrap_or(100.0),
            min_fuel: self.min_fuel.unwrap_or(0.0),
            capacity: self.capacity.unwrap_or(100.0),
            base_consumption: self.base_consumption.unwrap_or(0.0),
            payload_coefficient: self.payload_coefficient.unwrap_or(0.0),
            refueling_time: self.refueling_time.unwrap_or(0.0),
            refueling_cost: self.refueling_cost.unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_consumption_scales_with_payload() {
        let mut builder = VehicleBuilder::new(1);
        builder.set_base_consumption(0.5);
        builder.set_payload_coefficient(0.1);
        let vehicle = builder.build();

        assert_eq!(vehicle.energy_consumption(10.0, 0.0), 5.0);
        assert_eq!(vehicle.energy_consumption(10.0, 20.0), 25.0);
    }

    #[test]
    fn test_builder_defaults() {
        let vehicle = VehicleBuilder::new(7).build();

        assert_eq!(vehicle.external_id(), 7);
        assert_eq!(vehicle.speed(), 50.0);
        assert_eq!(vehicle.max_fuel(), 100.0);
        assert_eq!(vehicle.min_fuel(), 0.0);
        assert_eq!(vehicle.capacity(), 100.0);
    }
}
