mod coordination_tests;
mod inventory_properties;
