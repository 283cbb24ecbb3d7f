//! Property tests for the flight-control safety invariants

use aviary::{CommandOutcome, Drone, DroneState, Enclosure};
use proptest::collection::vec;
use proptest::prelude::*;

fn rectangle() -> Enclosure {
    Enclosure::from_vertices(
        &[(0.0, 0.0), (500.0, 0.0), (500.0, 1000.0), (0.0, 1000.0)],
        300.0,
    )
    .unwrap()
}

/// Amounts outside [min_move, max_move]
fn out_of_range_amount() -> impl Strategy<Value = f64> {
    prop_oneof![0.0..19.99f64, 500.01f64..5000.0]
}

proptest! {
    #[test]
    fn test_out_of_range_translations_never_move_the_drone(n in out_of_range_amount()) {
        let room = rectangle();
        let mut drone = Drone::new();
        drone.locate(250.0, 500.0, 33.0, &room);
        drone.take_off();
        let pose = *drone.current_position();

        drone.forward(n).unwrap();
        prop_assert_eq!(drone.command().unwrap().outcome, CommandOutcome::Rejected);
        drone.backward(n).unwrap();
        prop_assert_eq!(drone.command().unwrap().outcome, CommandOutcome::Rejected);
        drone.go_left(n).unwrap();
        prop_assert_eq!(drone.command().unwrap().outcome, CommandOutcome::Rejected);
        drone.go_right(n).unwrap();
        prop_assert_eq!(drone.command().unwrap().outcome, CommandOutcome::Rejected);

        prop_assert_eq!(*drone.current_position(), pose);
        prop_assert_eq!(drone.state(), DroneState::InFlight);
    }

    #[test]
    fn test_descents_never_break_the_safety_floor(steps in vec(1.0f64..400.0, 1..30)) {
        let room = rectangle();
        let mut drone = Drone::new();
        drone.locate(250.0, 500.0, 0.0, &room);
        drone.take_off();

        for n in steps {
            drone.go_down(n);
            let z = drone.current_position().z;
            prop_assert!(z >= drone.config().min_sec_altitude);
            prop_assert_eq!(drone.command().unwrap().outcome, CommandOutcome::Ok);
        }
        prop_assert_eq!(drone.state(), DroneState::InFlight);
    }

    #[test]
    fn test_rotations_accumulate_and_never_translate(
        turns in vec((any::<bool>(), 1.0f64..=360.0), 1..20)
    ) {
        let room = rectangle();
        let mut drone = Drone::new();
        drone.locate(250.0, 500.0, 0.0, &room);
        drone.take_off();
        let (x, y, z) = {
            let p = drone.current_position();
            (p.x, p.y, p.z)
        };

        let mut expected = 0.0f64;
        for (left, degrees) in turns {
            if left {
                drone.rotate_left(degrees);
                expected += degrees.to_radians();
            } else {
                drone.rotate_right(degrees);
                expected -= degrees.to_radians();
            }
        }

        prop_assert!((drone.heading() - expected).abs() < 1e-9);
        let p = drone.current_position();
        prop_assert_eq!((p.x, p.y, p.z), (x, y, z));
    }

    #[test]
    fn test_on_ground_translations_are_always_rejected(n in 0.0f64..5000.0) {
        let room = rectangle();
        let mut drone = Drone::new();
        drone.locate(250.0, 500.0, 0.0, &room);
        let pose = *drone.current_position();

        drone.forward(n).unwrap();
        prop_assert!(!drone.command().unwrap().accepted);
        drone.go_up(n).unwrap();
        prop_assert!(!drone.command().unwrap().accepted);

        prop_assert_eq!(*drone.current_position(), pose);
        prop_assert_eq!(drone.state(), DroneState::OnGround);
    }
}
