//! The live state of the simulation: vehicles and traffic light phases.
//!
//! The engine mutates a [TrafficState] once per tick while holding the
//! simulation lock; the view reads it under the same lock every frame.

use crate::color::Color;
use crate::{RoadSegmentId, VehicleId};
use slotmap::{SecondaryMap, SlotMap};
use smallvec::SmallVec;

/// A vehicle as seen by the view.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// Half the vehicle's length in m.
    half_len: f64,
    /// The vehicle's width in m.
    width: f64,
    /// The lane the vehicle is in, counted from the right-hand road edge.
    lane: u32,
    /// The longitudinal position of the centre of the vehicle in m.
    pos: f64,
    /// The velocity in m/s.
    speed: f64,
    /// The acceleration in m/s^2.
    acc: f64,
    brake_light: bool,
    /// The vehicle's own display colour, assigned on first use.
    color: Option<Color>,
    /// The road segment on which the vehicle will leave the network, once known.
    exit_road_segment: Option<RoadSegmentId>,
}

/// The attributes of a vehicle.
#[derive(Clone, Copy, Debug)]
pub struct VehicleAttributes {
    /// The vehicle length in m.
    pub length: f64,
    /// The vehicle width in m.
    pub width: f64,
}

impl Vehicle {
    /// Creates a stationary vehicle at the start of lane zero.
    pub fn new(attributes: &VehicleAttributes) -> Self {
        Self {
            half_len: 0.5 * attributes.length,
            width: attributes.width,
            lane: 0,
            pos: 0.0,
            speed: 0.0,
            acc: 0.0,
            brake_light: false,
            color: None,
            exit_road_segment: None,
        }
    }

    /// The vehicle's length in m.
    pub fn length(&self) -> f64 {
        2.0 * self.half_len
    }

    /// The vehicle's width in m.
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn lane(&self) -> u32 {
        self.lane
    }

    /// The longitudinal position of the front of the vehicle in m.
    pub fn pos_front(&self) -> f64 {
        self.pos + self.half_len
    }

    /// The longitudinal position of the rear of the vehicle in m.
    pub fn pos_rear(&self) -> f64 {
        self.pos - self.half_len
    }

    /// Moves the vehicle so its front is at `pos_front` in the given lane.
    pub fn set_location(&mut self, lane: u32, pos_front: f64) {
        self.lane = lane;
        self.pos = pos_front - self.half_len;
    }

    /// The vehicle's speed in m/s.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// The vehicle's acceleration in m/s^2.
    pub fn acc(&self) -> f64 {
        self.acc
    }

    pub fn set_acc(&mut self, acc: f64) {
        self.acc = acc;
    }

    pub fn is_brake_light_on(&self) -> bool {
        self.brake_light
    }

    pub fn set_brake_light(&mut self, on: bool) {
        self.brake_light = on;
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = Some(color);
    }

    pub fn exit_road_segment(&self) -> Option<RoadSegmentId> {
        self.exit_road_segment
    }

    pub fn set_exit_road_segment(&mut self, segment: Option<RoadSegmentId>) {
        self.exit_road_segment = segment;
    }
}

/// The phase of a traffic light.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrafficLightStatus {
    Green,
    /// Amber, after green.
    GreenRed,
    #[default]
    Red,
    /// Red and amber together, before green.
    RedGreen,
}

/// The vehicles in the network and the phases of its traffic lights.
#[derive(Default)]
pub struct TrafficState {
    vehicles: SlotMap<VehicleId, Vehicle>,
    /// The vehicles on each road segment, in order.
    on_segment: SecondaryMap<RoadSegmentId, Vec<VehicleId>>,
    /// The phases of each road segment's traffic lights, in the order the lights were added.
    lights: SecondaryMap<RoadSegmentId, SmallVec<[TrafficLightStatus; 4]>>,
}

impl TrafficState {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a vehicle to a road segment.
    pub fn add_vehicle(&mut self, segment: RoadSegmentId, vehicle: Vehicle) -> VehicleId {
        let id = self.vehicles.insert(vehicle);
        if let Some(entry) = self.on_segment.entry(segment) {
            entry.or_default().push(id);
        }
        id
    }

    /// Removes a vehicle from the network.
    pub fn remove_vehicle(&mut self, id: VehicleId) -> Option<Vehicle> {
        let vehicle = self.vehicles.remove(id)?;
        for (_, ids) in &mut self.on_segment {
            ids.retain(|v| *v != id);
        }
        Some(vehicle)
    }

    /// Moves a vehicle onto another road segment.
    pub fn transfer_vehicle(&mut self, id: VehicleId, to: RoadSegmentId) {
        for (_, ids) in &mut self.on_segment {
            ids.retain(|v| *v != id);
        }
        if self.vehicles.contains_key(id) {
            if let Some(entry) = self.on_segment.entry(to) {
                entry.or_default().push(id);
            }
        }
    }

    /// Removes all vehicles and light phases.
    pub fn clear(&mut self) {
        self.vehicles.clear();
        self.on_segment.clear();
        self.lights.clear();
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id)
    }

    pub fn vehicle_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(id)
    }

    /// The number of vehicles in the network.
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// The IDs of the vehicles on a road segment.
    pub fn vehicles_on(&self, segment: RoadSegmentId) -> &[VehicleId] {
        self.on_segment
            .get(segment)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Calls `f` with each vehicle on a road segment in turn.
    pub fn for_each_vehicle_on(&mut self, segment: RoadSegmentId, mut f: impl FnMut(&mut Vehicle)) {
        if let Some(ids) = self.on_segment.get(segment) {
            for id in ids {
                if let Some(vehicle) = self.vehicles.get_mut(*id) {
                    f(vehicle);
                }
            }
        }
    }

    /// Sets the phases of a road segment's traffic lights.
    pub fn set_light_states(
        &mut self,
        segment: RoadSegmentId,
        states: impl IntoIterator<Item = TrafficLightStatus>,
    ) {
        self.lights.insert(segment, states.into_iter().collect());
    }

    /// Gets the phase of a road segment's `index`-th traffic light.
    /// Lights without a reported phase are red.
    pub fn light_state(&self, segment: RoadSegmentId, index: usize) -> TrafficLightStatus {
        self.lights
            .get(segment)
            .and_then(|states| states.get(index).copied())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use slotmap::SlotMap;

    fn attributes() -> VehicleAttributes {
        VehicleAttributes {
            length: 4.0,
            width: 2.0,
        }
    }

    #[test]
    fn location_is_front_of_vehicle() {
        let mut vehicle = Vehicle::new(&attributes());
        vehicle.set_location(2, 30.0);
        assert_eq!(vehicle.lane(), 2);
        assert_eq!(vehicle.pos_front(), 30.0);
        assert_eq!(vehicle.pos_rear(), 26.0);
    }

    #[test]
    fn vehicles_follow_their_segment() {
        let mut segments = SlotMap::<RoadSegmentId, ()>::with_key();
        let a = segments.insert(());
        let b = segments.insert(());

        let mut state = TrafficState::new();
        let v1 = state.add_vehicle(a, Vehicle::new(&attributes()));
        let v2 = state.add_vehicle(a, Vehicle::new(&attributes()));
        assert_eq!(state.vehicles_on(a), &[v1, v2]);
        assert!(state.vehicles_on(b).is_empty());

        state.transfer_vehicle(v1, b);
        assert_eq!(state.vehicles_on(a), &[v2]);
        assert_eq!(state.vehicles_on(b), &[v1]);

        assert!(state.remove_vehicle(v1).is_some());
        assert!(state.vehicles_on(b).is_empty());
        assert_eq!(state.vehicle_count(), 1);
    }

    #[test]
    fn unreported_lights_are_red() {
        let mut segments = SlotMap::<RoadSegmentId, ()>::with_key();
        let a = segments.insert(());
        let mut state = TrafficState::new();
        assert_eq!(state.light_state(a, 0), TrafficLightStatus::Red);
        state.set_light_states(a, [TrafficLightStatus::Green]);
        assert_eq!(state.light_state(a, 0), TrafficLightStatus::Green);
        assert_eq!(state.light_state(a, 1), TrafficLightStatus::Red);
    }
}
