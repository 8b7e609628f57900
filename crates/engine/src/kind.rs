/// Creature and move typing for the catalog's reference generation.
///
/// The effectiveness chart is total over all pairs, so a lookup can never be
/// absent; unknown catalog type names simply fail to parse and contribute a
/// neutral 1.0 at the call site.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Kind {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
}

impl Kind {
    /// All seventeen kinds in chart order.
    pub const fn all() -> [Kind; 17] {
        [
            Kind::Normal,
            Kind::Fire,
            Kind::Water,
            Kind::Electric,
            Kind::Grass,
            Kind::Ice,
            Kind::Fighting,
            Kind::Poison,
            Kind::Ground,
            Kind::Flying,
            Kind::Psychic,
            Kind::Bug,
            Kind::Rock,
            Kind::Ghost,
            Kind::Dragon,
            Kind::Dark,
            Kind::Steel,
        ]
    }

    /// Effectiveness multiplier of an attack of this kind against one
    /// defending kind. Stacks multiplicatively across a dual typing.
    pub const fn effectiveness(self, defend: Kind) -> f64 {
        use Kind::*;
        match self {
            Normal => match defend {
                Rock | Steel => 0.5,
                Ghost => 0.0,
                _ => 1.0,
            },
            Fire => match defend {
                Fire | Water | Rock | Dragon => 0.5,
                Grass | Ice | Bug | Steel => 2.0,
                _ => 1.0,
            },
            Water => match defend {
                Water | Grass | Dragon => 0.5,
                Fire | Ground | Rock => 2.0,
                _ => 1.0,
            },
            Electric => match defend {
                Electric | Grass | Dragon => 0.5,
                Ground => 0.0,
                Water | Flying => 2.0,
                _ => 1.0,
            },
            Grass => match defend {
                Fire | Grass | Poison | Flying | Bug | Dragon | Steel => 0.5,
                Water | Ground | Rock => 2.0,
                _ => 1.0,
            },
            Ice => match defend {
                Fire | Water | Ice | Steel => 0.5,
                Grass | Ground | Flying | Dragon => 2.0,
                _ => 1.0,
            },
            Fighting => match defend {
                Poison | Flying | Psychic | Bug => 0.5,
                Ghost => 0.0,
                Normal | Ice | Rock | Dark | Steel => 2.0,
                _ => 1.0,
            },
            Poison => match defend {
                Poison | Ground | Rock | Ghost => 0.5,
                Steel => 0.0,
                Grass => 2.0,
                _ => 1.0,
            },
            Ground => match defend {
                Grass | Bug => 0.5,
                Flying => 0.0,
                Fire | Electric | Poison | Rock | Steel => 2.0,
                _ => 1.0,
            },
            Flying => match defend {
                Electric | Rock | Steel => 0.5,
                Grass | Fighting | Bug => 2.0,
                _ => 1.0,
            },
            Psychic => match defend {
                Psychic | Steel => 0.5,
                Dark => 0.0,
                Fighting | Poison => 2.0,
                _ => 1.0,
            },
            Bug => match defend {
                Fire | Fighting | Poison | Flying | Ghost | Steel => 0.5,
                Grass | Psychic | Dark => 2.0,
                _ => 1.0,
            },
            Rock => match defend {
                Fighting | Ground | Steel => 0.5,
                Fire | Ice | Flying | Bug => 2.0,
                _ => 1.0,
            },
            Ghost => match defend {
                Dark | Steel => 0.5,
                Normal => 0.0,
                Psychic | Ghost => 2.0,
                _ => 1.0,
            },
            Dragon => match defend {
                Steel => 0.5,
                Dragon => 2.0,
                _ => 1.0,
            },
            Dark => match defend {
                Fighting | Dark | Steel => 0.5,
                Psychic | Ghost => 2.0,
                _ => 1.0,
            },
            Steel => match defend {
                Fire | Water | Electric | Steel => 0.5,
                Ice | Rock => 2.0,
                _ => 1.0,
            },
        }
    }

    /// Effectiveness against a full defending typing: the product over every
    /// defending kind. Zero anywhere means no effect overall.
    pub fn against(self, defense: &[Kind]) -> f64 {
        defense
            .iter()
            .map(|kind| self.effectiveness(*kind))
            .product()
    }
}

/// str isomorphism over the catalog's lowercase type names
impl TryFrom<&str> for Kind {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Kind::Normal),
            "fire" => Ok(Kind::Fire),
            "water" => Ok(Kind::Water),
            "electric" => Ok(Kind::Electric),
            "grass" => Ok(Kind::Grass),
            "ice" => Ok(Kind::Ice),
            "fighting" => Ok(Kind::Fighting),
            "poison" => Ok(Kind::Poison),
            "ground" => Ok(Kind::Ground),
            "flying" => Ok(Kind::Flying),
            "psychic" => Ok(Kind::Psychic),
            "bug" => Ok(Kind::Bug),
            "rock" => Ok(Kind::Rock),
            "ghost" => Ok(Kind::Ghost),
            "dragon" => Ok(Kind::Dragon),
            "dark" => Ok(Kind::Dark),
            "steel" => Ok(Kind::Steel),
            _ => Err(format!("invalid kind str: {}", s)),
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Kind::Normal => write!(f, "normal"),
            Kind::Fire => write!(f, "fire"),
            Kind::Water => write!(f, "water"),
            Kind::Electric => write!(f, "electric"),
            Kind::Grass => write!(f, "grass"),
            Kind::Ice => write!(f, "ice"),
            Kind::Fighting => write!(f, "fighting"),
            Kind::Poison => write!(f, "poison"),
            Kind::Ground => write!(f, "ground"),
            Kind::Flying => write!(f, "flying"),
            Kind::Psychic => write!(f, "psychic"),
            Kind::Bug => write!(f, "bug"),
            Kind::Rock => write!(f, "rock"),
            Kind::Ghost => write!(f, "ghost"),
            Kind::Dragon => write!(f, "dragon"),
            Kind::Dark => write!(f, "dark"),
            Kind::Steel => write!(f, "steel"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_is_total() {
        for attack in Kind::all() {
            for defend in Kind::all() {
                let x = attack.effectiveness(defend);
                assert!([0.0, 0.5, 1.0, 2.0].contains(&x));
            }
        }
    }

    #[test]
    fn immunities() {
        assert_eq!(Kind::Normal.effectiveness(Kind::Ghost), 0.0);
        assert_eq!(Kind::Electric.effectiveness(Kind::Ground), 0.0);
        assert_eq!(Kind::Fighting.effectiveness(Kind::Ghost), 0.0);
        assert_eq!(Kind::Ground.effectiveness(Kind::Flying), 0.0);
        assert_eq!(Kind::Psychic.effectiveness(Kind::Dark), 0.0);
        assert_eq!(Kind::Ghost.effectiveness(Kind::Normal), 0.0);
        assert_eq!(Kind::Poison.effectiveness(Kind::Steel), 0.0);
    }

    #[test]
    fn dual_typing_multiplies() {
        // water against rock/ground quadruples
        assert_eq!(Kind::Water.against(&[Kind::Rock, Kind::Ground]), 4.0);
        // grass against fire/flying quarters
        assert_eq!(Kind::Grass.against(&[Kind::Fire, Kind::Flying]), 0.25);
    }

    #[test]
    fn defender_type_order_commutes() {
        for attack in Kind::all() {
            for a in Kind::all() {
                for b in Kind::all() {
                    assert_eq!(attack.against(&[a, b]), attack.against(&[b, a]));
                }
            }
        }
    }

    #[test]
    fn bijective_str() {
        for kind in Kind::all() {
            assert_eq!(Kind::try_from(kind.to_string().as_str()), Ok(kind));
        }
    }
}
