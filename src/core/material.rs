//! Named physical materials and the friction/restitution of each pairing.
//!
//! A [`MaterialTable`] is assembled once with [`MaterialTableBuilder`] and is
//! read-only afterwards: the world only ever resolves pairs from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Index of a material registered in a [`MaterialTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(usize);

impl MaterialId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Coefficients used when two materials touch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactMaterial {
    pub friction: f32,
    pub restitution: f32,
}

impl ContactMaterial {
    pub const fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
        }
    }
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self::new(0.3, 0.0)
    }
}

#[derive(Debug, Clone)]
pub struct MaterialTable {
    names: Vec<String>,
    pairs: HashMap<(MaterialId, MaterialId), ContactMaterial>,
    fallback: ContactMaterial,
}

impl MaterialTable {
    pub fn builder() -> MaterialTableBuilder {
        MaterialTableBuilder::default()
    }

    /// Materials used by the drop scene: "default" for balls and the floor,
    /// "concrete" for bricks.
    pub fn drop_scene() -> (Self, MaterialId, MaterialId) {
        let mut builder = Self::builder();
        let default = builder.material("default");
        let concrete = builder.material("concrete");
        let table = builder
            .pair(default, default, ContactMaterial::new(0.5, 0.7))
            .pair(default, concrete, ContactMaterial::new(5.0, 0.0))
            .fallback(ContactMaterial::new(0.5, 0.7))
            .build();
        (table, default, concrete)
    }

    /// Coefficients for a pair, in either order, or the fallback if unregistered.
    pub fn resolve(&self, a: MaterialId, b: MaterialId) -> ContactMaterial {
        self.pairs
            .get(&ordered(a, b))
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn find(&self, name: &str) -> Option<MaterialId> {
        self.names.iter().position(|n| n == name).map(MaterialId)
    }

    pub fn name(&self, id: MaterialId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::drop_scene().0
    }
}

#[derive(Debug, Default)]
pub struct MaterialTableBuilder {
    names: Vec<String>,
    pairs: HashMap<(MaterialId, MaterialId), ContactMaterial>,
    fallback: ContactMaterial,
}

impl MaterialTableBuilder {
    /// Registers a material, returning the existing id if the name is taken.
    pub fn material(&mut self, name: &str) -> MaterialId {
        if let Some(index) = self.names.iter().position(|n| n == name) {
            return MaterialId(index);
        }
        self.names.push(name.to_owned());
        MaterialId(self.names.len() - 1)
    }

    pub fn pair(mut self, a: MaterialId, b: MaterialId, contact: ContactMaterial) -> Self {
        self.pairs.insert(ordered(a, b), contact);
        self
    }

    pub fn fallback(mut self, contact: ContactMaterial) -> Self {
        self.fallback = contact;
        self
    }

    pub fn build(self) -> MaterialTable {
        MaterialTable {
            names: self.names,
            pairs: self.pairs,
            fallback: self.fallback,
        }
    }
}

fn ordered(a: MaterialId, b: MaterialId) -> (MaterialId, MaterialId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_resolve_in_either_order() {
        let (table, default, concrete) = MaterialTable::drop_scene();
        assert_eq!(table.resolve(concrete, default), ContactMaterial::new(5.0, 0.0));
        assert_eq!(table.resolve(default, concrete), ContactMaterial::new(5.0, 0.0));
        assert_eq!(table.resolve(default, default), ContactMaterial::new(0.5, 0.7));
    }

    #[test]
    fn unregistered_pair_uses_fallback() {
        let (table, _, concrete) = MaterialTable::drop_scene();
        assert_eq!(table.resolve(concrete, concrete), ContactMaterial::new(0.5, 0.7));
    }

    #[test]
    fn names_round_trip_through_lookup() {
        let (table, default, concrete) = MaterialTable::drop_scene();
        assert_eq!(table.find("concrete"), Some(concrete));
        assert_eq!(table.name(default), Some("default"));
        assert_eq!(table.find("rubber"), None);
        assert_eq!(table.len(), 2);
    }
}
