use std::fmt;

use thiserror::Error;

/// The substance held by a single grid cell.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Material {
    #[default]
    Empty = 0,
    Sand = 1,
    Water = 2,
    Wall = 3,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaterialError {
    #[error("unknown material id {0}")]
    UnknownId(u8),
}

impl Material {
    pub const ALL: [Material; 4] = [
        Material::Empty,
        Material::Sand,
        Material::Water,
        Material::Wall,
    ];

    pub fn is_empty(self) -> bool {
        matches!(self, Material::Empty)
    }

    /// Sand and water are subject to gravity; walls and empty cells are not.
    pub fn is_movable(self) -> bool {
        matches!(self, Material::Sand | Material::Water)
    }

    /// Whether `self`, while moving, may pass into a cell holding `other`.
    pub fn can_enter(self, other: Material) -> bool {
        match other {
            Material::Empty => true,
            Material::Water => self == Material::Sand,
            _ => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Material::Empty => "empty",
            Material::Sand => "sand",
            Material::Water => "water",
            Material::Wall => "wall",
        }
    }
}

impl TryFrom<u8> for Material {
    type Error = MaterialError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Material::Empty),
            1 => Ok(Material::Sand),
            2 => Ok(Material::Water),
            3 => Ok(Material::Wall),
            other => Err(MaterialError::UnknownId(other)),
        }
    }
}

impl From<Material> for u8 {
    fn from(material: Material) -> Self {
        material as u8
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for m in Material::ALL {
            assert_eq!(Material::try_from(u8::from(m)), Ok(m));
        }
        assert_eq!(Material::try_from(9), Err(MaterialError::UnknownId(9)));
    }

    #[test]
    fn only_sand_enters_water() {
        assert!(Material::Sand.can_enter(Material::Water));
        assert!(!Material::Water.can_enter(Material::Water));
        assert!(!Material::Sand.can_enter(Material::Sand));
        assert!(!Material::Sand.can_enter(Material::Wall));
        assert!(Material::Water.can_enter(Material::Empty));
    }
}
