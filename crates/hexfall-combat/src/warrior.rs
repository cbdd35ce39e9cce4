//! Warrior specialization.
//!
//! High health melee class. Generates Rage by attacking, loses it while idle,
//! and has a chance to make targets bleed.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ability::AbilityKind;
use crate::battlefield::Battlefield;
use crate::character::{Character, CombatState};
use crate::class::{CharacterClass, ClassKit};
use crate::damage::DamageType;
use crate::effects::StatusEffect;
use crate::stats::BaseStats;
use crate::talent::{Talent, TalentTree};

/// Duration of the Warrior's bleed in seconds.
pub const BLEED_DURATION: f32 = 5.0;
/// Distance at which the Warrior can hit a target.
pub const MELEE_RANGE: u32 = 1;
/// Ultimate charge gained per basic attack.
pub const BASIC_ATTACK_CHARGE: f32 = 5.0;
/// Health fraction that triggers Second Wind.
pub const SECOND_WIND_THRESHOLD: f32 = 0.3;

/// Warrior class stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Warrior {
    /// Rage per basic attack.
    pub rage_generation_rate: f32,
    /// Rage lost per second while idle.
    pub rage_decay_rate: f32,
    /// Armor ignored by attacks.
    pub armor_penetration: f32,
    /// Chance for a basic attack to cause bleeding.
    pub bleed_chance: f32,
    /// Bleed damage per second as a fraction of attack damage.
    pub bleed_damage_multiplier: f32,
    /// Whether Second Wind fired this life.
    pub second_wind_used: bool,
}

impl Default for Warrior {
    fn default() -> Self {
        Self {
            rage_generation_rate: 5.0,
            rage_decay_rate: 1.0,
            armor_penetration: 5.0,
            bleed_chance: 0.15,
            bleed_damage_multiplier: 0.5,
            second_wind_used: false,
        }
    }
}

impl Warrior {
    /// Basic melee swing.
    ///
    /// Rolls a crit, deals physical damage, generates rage (doubled on a
    /// crit), rolls for bleed and gains ultimate charge.
    fn basic_attack(&self, me: &mut Character, target: &mut Character) {
        let attack_damage = me.stats().derived().attack_damage;
        let crit_chance = me.stats().derived().crit_chance;
        let crit_multiplier = me.stats().derived().crit_multiplier;

        let critical = me.roll_chance(crit_chance);
        let damage = if critical {
            attack_damage * crit_multiplier
        } else {
            attack_damage
        };

        let report = me.deal_damage(target, damage, DamageType::Physical);
        trace!(
            "{} hits {} for {:.1}{}",
            me.name(),
            target.name(),
            report.actual,
            if critical { " (crit)" } else { "" }
        );

        let rage = if critical {
            self.rage_generation_rate * 2.0
        } else {
            self.rage_generation_rate
        };
        me.restore_resource(rage);

        if me.roll_chance(self.bleed_chance) {
            let bleed = StatusEffect::bleed(attack_damage * self.bleed_damage_multiplier, BLEED_DURATION)
                .with_name("Warrior's Bleed")
                .with_description("Bleeding from warrior attack");
            target.apply_status_effect(bleed);
        }

        me.gain_ultimate_charge(BASIC_ATTACK_CHARGE);
    }
}

impl ClassKit for Warrior {
    fn class(&self) -> CharacterClass {
        CharacterClass::Warrior
    }

    fn resource_name(&self) -> &'static str {
        "Rage"
    }

    fn initialize_base_stats(&self) -> BaseStats {
        BaseStats {
            stamina: 9,
            intelligence: 3,
            agility: 6,
            strength: 10,
            wisdom: 4,
        }
    }

    fn create_talent_tree(&self) -> TalentTree {
        TalentTree::new()
            // Tier 1
            .with_talent(Talent::ImprovedStrength, 1)
            .with_talent(Talent::TacticalMastery, 1)
            .with_talent(Talent::ImprovedCharge, 1)
            // Tier 2
            .with_talent(Talent::AngerManagement, 2)
            .with_talent(Talent::DeepWounds, 2)
            .with_talent(Talent::ImprovedCleave, 2)
            // Tier 3
            .with_talent(Talent::BloodthirstyStrike, 3)
            .with_talent(Talent::DefensiveMastery, 3)
            .with_talent(Talent::ImprovedExecute, 3)
            // Tier 4
            .with_talent(Talent::MortalStrike, 4)
            .with_talent(Talent::SecondWind, 4)
            .with_talent(Talent::ShieldWall, 4)
            // Tier 5 (ultimates)
            .with_talent(Talent::BattleCry, 5)
            .with_talent(Talent::RavagingStorm, 5)
            .with_talent(Talent::LastStand, 5)
    }

    fn starting_abilities(&self) -> Vec<AbilityKind> {
        vec![AbilityKind::Cleave, AbilityKind::Execute]
    }

    fn derive_class_stats(&mut self, effective: &BaseStats) {
        let strength = effective.strength as f32;
        self.rage_generation_rate = 5.0;
        self.rage_decay_rate = 1.0;
        self.armor_penetration = 5.0 + strength * 0.2;
        self.bleed_chance = 0.15 + strength * 0.005;
        self.bleed_damage_multiplier = 0.5 + strength * 0.01;
    }

    fn decide_next_action<B: Battlefield + ?Sized>(&self, me: &mut Character, battlefield: &mut B) {
        if matches!(me.combat_state(), CombatState::Dead | CombatState::Stunned) {
            return;
        }
        if !me.can_attack() {
            return;
        }

        let Some(target) = battlefield.nearest_enemy(me) else {
            me.set_combat_state(CombatState::Idle);
            return;
        };

        if !me.position().is_within(target.position(), MELEE_RANGE) {
            me.step_toward(target.position());
            me.set_combat_state(CombatState::Moving);
            return;
        }

        if me.is_ultimate_ready() && me.use_ultimate_ability(Some(&mut *target)).is_ok() {
            me.set_combat_state(CombatState::Casting);
            return;
        }

        let ready = me.abilities().iter().position(|ability| {
            !ability.is_on_cooldown() && me.stats().has_resource(ability.cost())
        });
        if let Some(slot) = ready {
            match me.use_ability(slot, Some(&mut *target)) {
                Ok(()) => {
                    me.set_combat_state(CombatState::Casting);
                    return;
                }
                Err(err) => debug!("{} could not use slot {}: {}", me.name(), slot, err),
            }
        }

        self.basic_attack(me, target);
        me.set_combat_state(CombatState::Attacking);
    }

    fn after_update(&self, me: &mut Character, dt: f32) {
        if !me.is_alive() {
            return;
        }

        if me.combat_state() == CombatState::Idle {
            me.drain_resource(self.rage_decay_rate * dt);
        }

        let second_wind = me.talents().rank(Talent::SecondWind);
        if second_wind > 0 && !self.second_wind_used && me.health_fraction() < SECOND_WIND_THRESHOLD
        {
            let amount = me.stats().max_health() * 0.1 * f32::from(second_wind);
            let healed = me.heal(amount);
            debug!("{} catches a second wind, healing {:.1}", me.name(), healed);
            if let Some(warrior) = me.specialization_mut().as_warrior_mut() {
                warrior.second_wind_used = true;
            }
        }
    }
}
