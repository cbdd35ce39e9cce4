//! Characters taking part in combat.
//!
//! A character aggregates stats, abilities, talents and status effects, and
//! owns the per-tick update and the damage pipeline. Class behaviour comes
//! from its [`Specialization`].

use hexfall_common::{CharacterId, GridPos};
use serde::{Deserialize, Serialize};
use std::mem;
use tracing::{debug, info, trace, warn};

use crate::ability::{Ability, AbilityKind};
use crate::battlefield::Battlefield;
use crate::class::{CharacterClass, ClassKit, Specialization, Tint};
use crate::damage::{DamageReport, DamageType};
use crate::effects::StatusEffect;
use crate::error::{ActionError, ActionResult};
use crate::stats::{StatBlock, StatType};
use crate::talent::{Talent, TalentRanks, TalentTree};
use crate::view::CharacterView;
use crate::warrior::Warrior;

/// Number of regular ability slots.
pub const MAX_ABILITY_SLOTS: usize = 3;
/// Ultimate charge needed to use the ultimate.
pub const MAX_ULTIMATE_CHARGE: u32 = 100;
/// Ultimate charge gained per regular ability use.
pub const ABILITY_CHARGE: f32 = 10.0;
/// Fraction of damage dealt converted into ultimate charge.
pub const DAMAGE_CHARGE_RATIO: f32 = 0.5;

/// What a character is doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatState {
    /// Not doing anything.
    #[default]
    Idle,
    /// Walking towards a target.
    Moving,
    /// Basic attacking.
    Attacking,
    /// Using an ability.
    Casting,
    /// Unable to act.
    Stunned,
    /// Dead. Terminal.
    Dead,
}

/// Outcome of applying a status effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectApplication {
    /// New effect added.
    Applied,
    /// Merged into an active stackable effect.
    Stacked,
    /// Active non-stackable effect had its duration reset.
    Refreshed,
    /// Target is dead.
    Ignored,
}

/// Clamp a negative or non-finite input to zero.
pub(crate) fn sanitize(value: f32, what: &str) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!("Clamping invalid {} {} to 0", what, value);
        0.0
    }
}

/// A combatant.
#[derive(Debug, Clone)]
pub struct Character {
    id: CharacterId,
    name: String,
    class: CharacterClass,
    resource_name: &'static str,
    level: u32,
    experience: u32,
    talent_points: u32,
    stats: StatBlock,
    position: GridPos,
    abilities: Vec<Ability>,
    ultimate: Option<Ability>,
    talent_tree: TalentTree,
    talents: TalentRanks,
    effects: Vec<StatusEffect>,
    alive: bool,
    combat_state: CombatState,
    ultimate_charge: u32,
    specialization: Specialization,
    rng: fastrand::Rng,
}

impl Character {
    /// Create a level 1 character of a specialization.
    #[must_use]
    pub fn new(name: impl Into<String>, specialization: Specialization) -> Self {
        let mut character = Self {
            id: CharacterId::new(),
            name: name.into(),
            class: specialization.class(),
            resource_name: specialization.resource_name(),
            level: 1,
            experience: 0,
            talent_points: 0,
            stats: StatBlock::new(specialization.initialize_base_stats()),
            position: GridPos::ORIGIN,
            abilities: Vec::new(),
            ultimate: None,
            talent_tree: specialization.create_talent_tree(),
            talents: TalentRanks::new(),
            effects: Vec::new(),
            alive: true,
            combat_state: CombatState::Idle,
            ultimate_charge: 0,
            specialization,
            rng: fastrand::Rng::new(),
        };
        character.learn_starting_abilities(specialization.starting_abilities());
        character.recompute();
        character.stats.fill_pools();
        character
    }

    /// Slot a class's starting abilities, skipping any the slots reject.
    fn learn_starting_abilities(&mut self, kinds: impl IntoIterator<Item = AbilityKind>) {
        for kind in kinds {
            if let Err(e) = self.learn_regular_ability(Ability::new(kind)) {
                warn!("{} cannot start with {}: {e}", self.name, kind.name());
            }
        }
    }

    /// Create a level 1 warrior.
    #[must_use]
    pub fn warrior(name: impl Into<String>) -> Self {
        Self::new(name, Specialization::Warrior(Warrior::default()))
    }

    /// Builder: seed the random source used for crits and procs.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Builder: set grid position.
    #[must_use]
    pub fn with_position(mut self, position: GridPos) -> Self {
        self.position = position;
        self
    }

    /// Builder: level up until `level` is reached.
    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        while self.level < level {
            self.level_up();
        }
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Unique id.
    #[must_use]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    /// Name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class tag.
    #[must_use]
    pub fn class(&self) -> CharacterClass {
        self.class
    }

    /// Name of the class resource.
    #[must_use]
    pub fn resource_name(&self) -> &'static str {
        self.resource_name
    }

    /// Current level.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Experience towards the next level.
    #[must_use]
    pub fn experience(&self) -> u32 {
        self.experience
    }

    /// Experience needed for the next level: `100 * level²`.
    #[must_use]
    pub fn experience_to_next_level(&self) -> u32 {
        100u32.saturating_mul(self.level.saturating_mul(self.level))
    }

    /// Unspent talent points.
    #[must_use]
    pub fn talent_points(&self) -> u32 {
        self.talent_points
    }

    /// Stats.
    #[must_use]
    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    /// Grid position.
    #[must_use]
    pub fn position(&self) -> GridPos {
        self.position
    }

    /// Regular abilities in slot order.
    #[must_use]
    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    /// Ultimate ability.
    #[must_use]
    pub fn ultimate(&self) -> Option<&Ability> {
        self.ultimate.as_ref()
    }

    /// Talent tree.
    #[must_use]
    pub fn talent_tree(&self) -> &TalentTree {
        &self.talent_tree
    }

    /// Talent ranks.
    #[must_use]
    pub fn talents(&self) -> &TalentRanks {
        &self.talents
    }

    /// Active status effects in application order.
    #[must_use]
    pub fn effects(&self) -> &[StatusEffect] {
        &self.effects
    }

    /// Check if alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Current combat state.
    #[must_use]
    pub fn combat_state(&self) -> CombatState {
        self.combat_state
    }

    /// Ultimate charge (0-100).
    #[must_use]
    pub fn ultimate_charge(&self) -> u32 {
        self.ultimate_charge
    }

    /// Check whether an ultimate is assigned and fully charged.
    #[must_use]
    pub fn is_ultimate_ready(&self) -> bool {
        self.ultimate.is_some() && self.ultimate_charge >= MAX_ULTIMATE_CHARGE
    }

    /// Class state.
    #[must_use]
    pub fn specialization(&self) -> &Specialization {
        &self.specialization
    }

    pub(crate) fn specialization_mut(&mut self) -> &mut Specialization {
        &mut self.specialization
    }

    /// Health as a fraction of max health.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        self.stats.health_percent()
    }

    /// Resource as a fraction of max resource.
    #[must_use]
    pub fn resource_fraction(&self) -> f32 {
        self.stats.resource_percent()
    }

    /// Draw color of the class.
    #[must_use]
    pub fn tint(&self) -> Tint {
        self.class.tint()
    }

    /// Snapshot for presentation.
    #[must_use]
    pub fn view(&self) -> CharacterView {
        CharacterView::from(self)
    }

    // ========================================================================
    // Update
    // ========================================================================

    /// Advance the character by `dt` seconds.
    ///
    /// Regenerates, ticks status effects, ticks cooldowns, then lets the
    /// class decide an action against `battlefield`.
    pub fn update<B: Battlefield + ?Sized>(&mut self, dt: f32, battlefield: &mut B) {
        let dt = sanitize(dt, "dt");
        if !self.alive {
            return;
        }

        self.stats.regenerate(dt);
        self.update_effects(dt);

        for ability in &mut self.abilities {
            ability.tick_cooldown(dt);
        }
        if let Some(ultimate) = &mut self.ultimate {
            ultimate.tick_cooldown(dt);
        }

        if !self.alive {
            return;
        }
        let kit = self.specialization;
        kit.decide_next_action(self, battlefield);
        let kit = self.specialization;
        kit.after_update(self, dt);
    }

    fn update_effects(&mut self, dt: f32) {
        let mut effects = mem::take(&mut self.effects);
        let periodic: f32 = effects.iter_mut().map(|effect| effect.tick(dt)).sum();

        let (expired, active): (Vec<_>, Vec<_>) =
            effects.into_iter().partition(StatusEffect::is_expired);
        self.effects = active;

        for effect in &expired {
            debug!("{} fades from {}", effect.name(), self.name);
            effect.on_remove(self);
        }

        if periodic > 0.0 {
            trace!("{} takes {:.1} periodic damage", self.name, periodic);
            self.take_damage(periodic, DamageType::Physical, None);
        }
    }

    // ========================================================================
    // Damage and healing
    // ========================================================================

    /// Multiplier on damage taken from active effects.
    #[must_use]
    pub fn damage_taken_multiplier(&self) -> f32 {
        self.effects
            .iter()
            .map(StatusEffect::damage_taken_multiplier)
            .product()
    }

    /// Multiplier on damage dealt from active effects.
    #[must_use]
    pub fn damage_dealt_multiplier(&self) -> f32 {
        self.effects
            .iter()
            .map(StatusEffect::damage_dealt_multiplier)
            .product()
    }

    /// Multiplier on healing received from active effects.
    #[must_use]
    pub fn healing_multiplier(&self) -> f32 {
        self.effects
            .iter()
            .map(StatusEffect::healing_multiplier)
            .product()
    }

    /// Check whether the character may attack.
    #[must_use]
    pub fn can_attack(&self) -> bool {
        self.alive && !self.effects.iter().any(StatusEffect::prevents_attacks)
    }

    /// Receive damage.
    ///
    /// Mitigation depends on `damage_type`; the result is scaled by active
    /// effects. The `source`, if any, gains ultimate charge from the damage
    /// dealt. Dead characters ignore damage.
    pub fn take_damage(
        &mut self,
        raw: f32,
        damage_type: DamageType,
        source: Option<&mut Character>,
    ) -> DamageReport {
        let raw = sanitize(raw, "damage");
        if !self.alive {
            return DamageReport::ignored(raw, damage_type);
        }

        let mitigation = damage_type.mitigation(self.stats.derived());
        let actual = (raw * (1.0 - mitigation)).max(0.0) * self.damage_taken_multiplier();
        self.stats.lose_health(actual);

        let killed = self.stats.health() <= 0.0;
        if killed {
            self.die();
        }

        if let Some(source) = source {
            source.gain_ultimate_charge(actual * DAMAGE_CHARGE_RATIO);
        }

        DamageReport {
            raw,
            damage_type,
            mitigation,
            actual,
            killed,
        }
    }

    /// Deal damage to `target`, scaled by this character's active effects.
    pub fn deal_damage(
        &mut self,
        target: &mut Character,
        raw: f32,
        damage_type: DamageType,
    ) -> DamageReport {
        let amount = sanitize(raw, "damage") * self.damage_dealt_multiplier();
        target.take_damage(amount, damage_type, Some(self))
    }

    /// Restore health, returns the health actually gained.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.alive {
            return 0.0;
        }
        let amount = sanitize(amount, "heal") * self.healing_multiplier();
        self.stats.gain_health(amount)
    }

    /// Add resource up to the maximum.
    pub fn restore_resource(&mut self, amount: f32) {
        self.stats.gain_resource(sanitize(amount, "resource"));
    }

    /// Remove resource down to zero.
    pub fn drain_resource(&mut self, amount: f32) {
        self.stats.lose_resource(sanitize(amount, "resource"));
    }

    /// Drop to zero health and die.
    pub fn kill(&mut self) {
        let health = self.stats.health();
        self.stats.lose_health(health);
        self.die();
    }

    fn die(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.combat_state = CombatState::Dead;
        info!("{} ({}) has died", self.name, self.id);
    }

    // ========================================================================
    // Abilities
    // ========================================================================

    /// Add ultimate charge, capped at the maximum. Fractions are dropped.
    pub fn gain_ultimate_charge(&mut self, amount: f32) {
        let amount = sanitize(amount, "charge") as u32;
        self.ultimate_charge = self
            .ultimate_charge
            .saturating_add(amount)
            .min(MAX_ULTIMATE_CHARGE);
    }

    /// Use the regular ability in `slot`.
    ///
    /// Rejected without any change when the slot is empty, the ability is
    /// cooling down or the resource is too low.
    pub fn use_ability(&mut self, slot: usize, target: Option<&mut Character>) -> ActionResult<()> {
        if !self.alive {
            return Err(ActionError::Dead);
        }
        let ability = self.abilities.get(slot).ok_or(ActionError::EmptySlot(slot))?;
        if ability.is_on_cooldown() {
            return Err(ActionError::OnCooldown {
                remaining: ability.remaining_cooldown(),
            });
        }
        if !self.stats.has_resource(ability.cost()) {
            return Err(ActionError::InsufficientResource {
                required: ability.cost(),
                available: self.stats.resource(),
            });
        }
        let kind = ability.kind();
        let cost = ability.cost();
        if kind.requires_target() && target.is_none() {
            return Err(ActionError::NoTarget);
        }

        kind.activate(self, target);
        self.stats.lose_resource(cost);
        if let Some(ability) = self.abilities.get_mut(slot) {
            ability.start_cooldown();
        }
        self.gain_ultimate_charge(ABILITY_CHARGE);
        Ok(())
    }

    /// Use the ultimate ability. Requires full charge; resets it to zero.
    pub fn use_ultimate_ability(&mut self, target: Option<&mut Character>) -> ActionResult<()> {
        if !self.alive {
            return Err(ActionError::Dead);
        }
        let kind = self
            .ultimate
            .as_ref()
            .map(Ability::kind)
            .ok_or(ActionError::NoUltimate)?;
        if self.ultimate_charge < MAX_ULTIMATE_CHARGE {
            return Err(ActionError::UltimateNotReady {
                charge: self.ultimate_charge,
            });
        }
        if kind.requires_target() && target.is_none() {
            return Err(ActionError::NoTarget);
        }

        kind.activate(self, target);
        self.ultimate_charge = 0;
        Ok(())
    }

    /// Learn a regular ability into the first free slot, returns the slot.
    pub fn learn_regular_ability(&mut self, ability: Ability) -> ActionResult<usize> {
        if ability.is_ultimate() {
            return Err(ActionError::NotRegular);
        }
        if self.abilities.len() >= MAX_ABILITY_SLOTS {
            return Err(ActionError::SlotsFull);
        }
        debug!("{} learns {}", self.name, ability.name());
        self.abilities.push(ability);
        Ok(self.abilities.len() - 1)
    }

    /// Set the ultimate ability, replacing any current one.
    pub fn set_ultimate_ability(&mut self, ability: Ability) -> ActionResult<()> {
        if ability.is_regular() {
            return Err(ActionError::NotUltimate);
        }
        debug!("{} sets ultimate {}", self.name, ability.name());
        self.ultimate = Some(ability);
        Ok(())
    }

    // ========================================================================
    // Status effects
    // ========================================================================

    /// Apply a status effect.
    ///
    /// An active effect of the same kind absorbs the incoming one (stack or
    /// refresh). Otherwise the effect is added and its apply hook runs.
    pub fn apply_status_effect(&mut self, effect: StatusEffect) -> EffectApplication {
        if !self.alive {
            return EffectApplication::Ignored;
        }

        if let Some(index) = self.effects.iter().position(|e| e.same_kind(&effect)) {
            let existing = &mut self.effects[index];
            if existing.is_stackable() {
                existing.stack(&effect);
                EffectApplication::Stacked
            } else {
                existing.refresh(&effect);
                EffectApplication::Refreshed
            }
        } else {
            debug!("{} afflicted by {}", self.name, effect.name());
            effect.on_apply(self);
            self.effects.push(effect);
            EffectApplication::Applied
        }
    }

    // ========================================================================
    // Progression
    // ========================================================================

    /// Add experience, levelling up at most once. Returns whether a level
    /// was gained.
    pub fn gain_experience(&mut self, amount: u32) -> bool {
        self.experience = self.experience.saturating_add(amount);
        let required = self.experience_to_next_level();
        if self.experience >= required {
            self.experience -= required;
            self.level_up();
            true
        } else {
            false
        }
    }

    /// Gain a level and a talent point.
    pub fn level_up(&mut self) {
        self.level = self.level.saturating_add(1);
        self.talent_points = self.talent_points.saturating_add(1);
        self.recompute();
        info!("{} reached level {}", self.name, self.level);
    }

    /// Add to a base attribute.
    pub fn increase_stat(&mut self, stat: StatType, amount: i32) {
        self.stats.add_base(stat, amount);
        self.recompute();
    }

    /// Spend a talent point on `talent`, returns its new rank.
    ///
    /// A first rank also grants any ability tied to the talent.
    pub fn unlock_talent(&mut self, talent: Talent) -> ActionResult<u8> {
        if self.talent_points == 0 {
            return Err(ActionError::NoTalentPoints);
        }
        if !self.talent_tree.is_eligible(talent, &self.talents) {
            return Err(ActionError::TalentNotEligible(talent));
        }
        if self.talents.rank(talent) >= talent.max_rank() {
            return Err(ActionError::TalentMaxRank(talent));
        }

        self.talent_points -= 1;
        let rank = self.talents.increment(talent);
        if rank == 1 {
            self.grant_talent_ability(talent);
        }
        self.recompute();
        debug!("{} unlocked {} rank {}", self.name, talent.name(), rank);
        Ok(rank)
    }

    fn grant_talent_ability(&mut self, talent: Talent) {
        let Some(kind) = talent.granted_ability() else {
            return;
        };
        let ability = Ability::new(kind);
        let result = if kind.is_ultimate() {
            self.set_ultimate_ability(ability)
        } else {
            self.learn_regular_ability(ability).map(|_| ())
        };
        if let Err(err) = result {
            debug!("{} could not learn {}: {}", self.name, kind.name(), err);
        }
    }

    /// Rebuild derived stats from base stats, class and talents.
    ///
    /// Talents apply tier ascending, then in tree order.
    pub fn recompute(&mut self) {
        let bonuses: Vec<_> = self
            .talent_tree
            .iter()
            .filter_map(|talent| talent.attribute_bonus(self.talents.rank(talent)))
            .collect();

        let tree = &self.talent_tree;
        let ranks = &self.talents;
        let specialization = &mut self.specialization;
        self.stats.recompute_with(&bonuses, |effective, derived| {
            specialization.derive_class_stats(effective);
            for talent in tree.iter() {
                talent.apply_modifiers(ranks.rank(talent), derived, specialization);
            }
        });
    }

    // ========================================================================
    // Movement and state
    // ========================================================================

    /// Teleport to a grid cell.
    pub fn move_to(&mut self, position: GridPos) {
        self.position = position;
    }

    /// Move one cell towards `target`.
    pub fn step_toward(&mut self, target: GridPos) {
        self.position = self.position.step_toward(target);
    }

    /// Grid distance to another character.
    #[must_use]
    pub fn distance_to(&self, other: &Character) -> u32 {
        self.position.distance_to(other.position)
    }

    /// Set combat state. Dead is terminal; requesting it kills.
    pub fn set_combat_state(&mut self, state: CombatState) {
        if self.combat_state == CombatState::Dead {
            return;
        }
        if state == CombatState::Dead {
            self.die();
        } else {
            self.combat_state = state;
        }
    }

    /// Roll against a probability.
    pub fn roll_chance(&mut self, chance: f32) -> bool {
        self.rng.f32() < chance
    }
}
