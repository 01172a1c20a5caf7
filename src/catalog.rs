//! Default catalogs offered to clients as a starting point.

use crate::model::{CargoItem, CargoType, ContainerType, Priority};

/// Standard ISO sea containers (inner dimensions in cm).
pub fn default_containers() -> Vec<ContainerType> {
    vec![
        ContainerType {
            id: "20GP".to_string(),
            name: "20GP (standard)".to_string(),
            length: 589.0,
            width: 235.0,
            height: 239.0,
            max_weight: 28_000.0,
            cost: 3000.0,
            enabled: true,
        },
        ContainerType {
            id: "40GP".to_string(),
            name: "40GP (general purpose)".to_string(),
            length: 1203.0,
            width: 235.0,
            height: 239.0,
            max_weight: 28_000.0,
            cost: 4500.0,
            enabled: true,
        },
        ContainerType {
            id: "40HQ".to_string(),
            name: "40HQ (high cube)".to_string(),
            length: 1203.0,
            width: 235.0,
            height: 269.0,
            max_weight: 28_500.0,
            cost: 5200.0,
            enabled: true,
        },
    ]
}

/// A small mixed shipment exercising every priority.
pub fn default_cargo() -> Vec<CargoItem> {
    vec![
        CargoItem {
            id: "SKU-001".to_string(),
            name: "Standard carton A (light)".to_string(),
            length: 50.0,
            width: 40.0,
            height: 30.0,
            weight: 10.0,
            quantity: 80,
            can_rotate: true,
            cargo_type: CargoType::Carton,
            priority: Priority::Low,
            color: "#60a5fa".to_string(),
        },
        CargoItem {
            id: "SKU-002".to_string(),
            name: "Heavy base B (bottom)".to_string(),
            length: 100.0,
            width: 100.0,
            height: 50.0,
            weight: 500.0,
            quantity: 4,
            can_rotate: false,
            cargo_type: CargoType::Crate,
            priority: Priority::Low,
            color: "#475569".to_string(),
        },
        CargoItem {
            id: "SKU-003".to_string(),
            name: "Long parts C".to_string(),
            length: 120.0,
            width: 30.0,
            height: 30.0,
            weight: 15.0,
            quantity: 30,
            can_rotate: true,
            cargo_type: CargoType::Carton,
            priority: Priority::Medium,
            color: "#34d399".to_string(),
        },
        CargoItem {
            id: "SKU-004".to_string(),
            name: "Urgent D (door)".to_string(),
            length: 40.0,
            width: 40.0,
            height: 40.0,
            weight: 8.0,
            quantity: 12,
            can_rotate: true,
            cargo_type: CargoType::Carton,
            priority: Priority::High,
            color: "#f87171".to_string(),
        },
    ]
}
