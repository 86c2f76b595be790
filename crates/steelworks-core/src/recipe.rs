use crate::additive::{AdditiveSlot, ItemMatcher, MatchRule};
use crate::fluid::FluidAmount;
use crate::id::{FluidKind, ItemKind};
use crate::item::ItemBatch;
use crate::registry::RecipeError;
use crate::rng::RandomSource;
use crate::tag::TagResolver;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Output rules
// ---------------------------------------------------------------------------

/// How much output fluid one conversion yields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputRule {
    /// Fixed volume of `fluid` per conversion.
    PerConversion { fluid: FluidKind, volume: u32 },
    /// Volume per conversion picked from a heat table: the entry with the
    /// highest threshold at or below the current temperature. Below every
    /// threshold the first entry applies. Sorted by threshold on registration.
    ByTemperature {
        fluid: FluidKind,
        steps: Vec<TemperatureStep>,
    },
}

/// One row of an [`OutputRule::ByTemperature`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureStep {
    pub min_temperature: i32,
    pub volume: u32,
}

impl OutputRule {
    pub fn fluid(&self) -> FluidKind {
        match self {
            OutputRule::PerConversion { fluid, .. } | OutputRule::ByTemperature { fluid, .. } => {
                *fluid
            }
        }
    }

    /// Output volume of a single conversion at `temperature`.
    pub fn volume_per_conversion(&self, temperature: i32) -> u32 {
        match self {
            OutputRule::PerConversion { volume, .. } => *volume,
            OutputRule::ByTemperature { steps, .. } => steps
                .iter()
                .rev()
                .find(|step| step.min_temperature <= temperature)
                .or_else(|| steps.first())
                .map(|step| step.volume)
                .unwrap_or(0),
        }
    }

    /// The temperature-independent output of one conversion, if there is one.
    pub fn nominal(&self) -> Option<FluidAmount> {
        match self {
            OutputRule::PerConversion { fluid, volume } => Some(FluidAmount::new(*fluid, *volume)),
            OutputRule::ByTemperature { .. } => None,
        }
    }

    fn validate(&mut self, recipe: &str) -> Result<(), RecipeError> {
        match self {
            OutputRule::PerConversion { volume, .. } => {
                if *volume == 0 {
                    return Err(RecipeError::ZeroOutputVolume(recipe.to_string()));
                }
            }
            OutputRule::ByTemperature { steps, .. } => {
                if steps.is_empty() || steps.iter().any(|s| s.volume == 0) {
                    return Err(RecipeError::ZeroOutputVolume(recipe.to_string()));
                }
                steps.sort_by_key(|s| s.min_temperature);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Stall reasons
// ---------------------------------------------------------------------------

/// Why a matched recipe cannot mix right now. All of these are recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StallReason {
    BelowTemperature,
    InsufficientFluid,
    MissingAdditive(AdditiveSlot),
    OutputFull,
}

// ---------------------------------------------------------------------------
// Builder (Building state)
// ---------------------------------------------------------------------------

/// A mix recipe under construction. Additive lists stay mutable until the
/// recipe is frozen into a [`crate::registry::RecipeRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixRecipeBuilder {
    name: String,
    input: FluidAmount,
    output: OutputRule,
    min_temperature: i32,
    additives: [Vec<MatchRule>; 3],
}

impl MixRecipeBuilder {
    /// `input.volume` is the amount of input fluid one conversion uses.
    pub fn new(name: &str, input: FluidAmount, output: OutputRule) -> Self {
        Self {
            name: name.to_string(),
            input,
            output,
            min_temperature: 0,
            additives: [Vec::new(), Vec::new(), Vec::new()],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_temperature(mut self, temperature: i32) -> Self {
        self.min_temperature = temperature;
        self
    }

    pub fn rules(&self, slot: AdditiveSlot) -> &[MatchRule] {
        &self.additives[slot_index(slot)]
    }

    /// Append a rule to the given slot.
    pub fn add_additive(&mut self, slot: AdditiveSlot, rule: MatchRule) -> &mut Self {
        self.additives[slot_index(slot)].push(rule);
        self
    }

    pub fn add_oxidizer(mut self, rule: MatchRule) -> Self {
        self.add_additive(AdditiveSlot::Oxidizer, rule);
        self
    }

    pub fn oxidizer_item(self, item: ItemKind, consume: i32) -> Self {
        self.add_oxidizer(MatchRule::item(item, consume))
    }

    pub fn oxidizer_tag(self, tag: &str, consume: i32) -> Self {
        self.add_oxidizer(MatchRule::tag(tag, consume))
    }

    pub fn add_reducer(mut self, rule: MatchRule) -> Self {
        self.add_additive(AdditiveSlot::Reducer, rule);
        self
    }

    pub fn reducer_item(self, item: ItemKind, consume: i32) -> Self {
        self.add_reducer(MatchRule::item(item, consume))
    }

    pub fn reducer_tag(self, tag: &str, consume: i32) -> Self {
        self.add_reducer(MatchRule::tag(tag, consume))
    }

    pub fn add_purifier(mut self, rule: MatchRule) -> Self {
        self.add_additive(AdditiveSlot::Purifier, rule);
        self
    }

    pub fn purifier_item(self, item: ItemKind, consume: i32) -> Self {
        self.add_purifier(MatchRule::item(item, consume))
    }

    pub fn purifier_tag(self, tag: &str, consume: i32) -> Self {
        self.add_purifier(MatchRule::tag(tag, consume))
    }

    /// Check everything that can be checked before tags are resolved.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.input.volume == 0 {
            return Err(RecipeError::ZeroInputVolume(self.name.clone()));
        }
        self.output.clone().validate(&self.name)?;
        for slot in AdditiveSlot::ALL {
            let rules = self.rules(slot);
            if rules.is_empty() {
                return Err(RecipeError::NoAdditives {
                    recipe: self.name.clone(),
                    slot,
                });
            }
            if rules
                .iter()
                .any(|r| matches!(&r.matcher, ItemMatcher::Items(items) if items.is_empty()))
            {
                return Err(RecipeError::EmptyMatcher {
                    recipe: self.name.clone(),
                    slot,
                });
            }
            if let Some(bad) = rules.iter().find(|r| !r.chance_in_range()) {
                return Err(RecipeError::InvalidChance {
                    recipe: self.name.clone(),
                    slot,
                    chance: bad.consume_chance,
                });
            }
        }
        Ok(())
    }

    /// Validate, resolve tags, and freeze.
    pub(crate) fn freeze(mut self, resolver: &impl TagResolver) -> Result<MixRecipe, RecipeError> {
        self.validate()?;
        self.output.validate(&self.name)?;
        for rules in &mut self.additives {
            for rule in rules.iter_mut() {
                if !rule.matcher.resolve(resolver) {
                    let tag = rule.matcher.tag_name().unwrap_or_default().to_string();
                    return Err(RecipeError::UnknownTag {
                        recipe: self.name.clone(),
                        tag,
                    });
                }
                if let ItemMatcher::Tag { name, members } = &rule.matcher {
                    if members.is_empty() {
                        log::warn!("mix recipe '{}': tag '{name}' has no members", self.name);
                    }
                }
            }
        }
        Ok(MixRecipe {
            name: self.name,
            input: self.input,
            output: self.output,
            min_temperature: self.min_temperature,
            additives: self.additives,
        })
    }
}

fn slot_index(slot: AdditiveSlot) -> usize {
    match slot {
        AdditiveSlot::Oxidizer => 0,
        AdditiveSlot::Reducer => 1,
        AdditiveSlot::Purifier => 2,
    }
}

// ---------------------------------------------------------------------------
// Active recipe
// ---------------------------------------------------------------------------

/// A registered mix recipe: input fluid + three additive slots + heat gate.
///
/// Only reachable through a frozen registry, so its rule lists can no longer
/// change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixRecipe {
    name: String,
    input: FluidAmount,
    output: OutputRule,
    min_temperature: i32,
    additives: [Vec<MatchRule>; 3],
}

impl MixRecipe {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input fluid kind and the volume one conversion uses.
    pub fn input(&self) -> FluidAmount {
        self.input
    }

    pub fn output_rule(&self) -> &OutputRule {
        &self.output
    }

    pub fn min_temperature(&self) -> i32 {
        self.min_temperature
    }

    pub fn rules(&self, slot: AdditiveSlot) -> &[MatchRule] {
        &self.additives[slot_index(slot)]
    }

    /// First rule in `slot` accepting the batch.
    pub fn matching_rule(&self, slot: AdditiveSlot, batch: &ItemBatch) -> Option<&MatchRule> {
        self.rules(slot).iter().find(|rule| rule.matches(batch))
    }

    /// Identity check: fluid kind and item kinds only. Stack sizes and
    /// temperature are ignored; see [`MixRecipe::can_mix`].
    pub fn matches(
        &self,
        fluid: &FluidAmount,
        oxidizer: &ItemBatch,
        reducer: &ItemBatch,
        purifier: &ItemBatch,
    ) -> bool {
        fluid.kind == self.input.kind
            && [oxidizer, reducer, purifier]
                .into_iter()
                .zip(AdditiveSlot::ALL)
                .all(|(batch, slot)| self.matching_rule(slot, batch).is_some())
    }

    /// Applicability check, assuming [`MixRecipe::matches`] already passed.
    pub fn can_mix(
        &self,
        fluid: &FluidAmount,
        oxidizer: &ItemBatch,
        reducer: &ItemBatch,
        purifier: &ItemBatch,
        temperature: i32,
    ) -> bool {
        self.check(fluid, oxidizer, reducer, purifier, temperature)
            .is_ok()
    }

    /// Like [`MixRecipe::can_mix`] but reports why mixing is blocked.
    pub fn check(
        &self,
        fluid: &FluidAmount,
        oxidizer: &ItemBatch,
        reducer: &ItemBatch,
        purifier: &ItemBatch,
        temperature: i32,
    ) -> Result<(), StallReason> {
        if temperature < self.min_temperature {
            return Err(StallReason::BelowTemperature);
        }
        if fluid.volume < self.input.volume {
            return Err(StallReason::InsufficientFluid);
        }
        for (batch, slot) in [oxidizer, reducer, purifier]
            .into_iter()
            .zip(AdditiveSlot::ALL)
        {
            if batch.is_empty() || self.matching_rule(slot, batch).is_none() {
                return Err(StallReason::MissingAdditive(slot));
            }
        }
        Ok(())
    }

    /// Whole conversions available, capped by the fluid volume and by every
    /// additive that can be consumed. Rules that never consume do not cap.
    pub fn conversions(
        &self,
        fluid: &FluidAmount,
        oxidizer: &ItemBatch,
        reducer: &ItemBatch,
        purifier: &ItemBatch,
    ) -> u32 {
        if fluid.kind != self.input.kind {
            return 0;
        }
        let mut limit = fluid.volume / self.input.volume;
        for (batch, slot) in [oxidizer, reducer, purifier]
            .into_iter()
            .zip(AdditiveSlot::ALL)
        {
            match self.matching_rule(slot, batch) {
                Some(rule) if rule.consumes() => limit = limit.min(batch.count),
                Some(_) => {}
                None => return 0,
            }
        }
        limit
    }

    /// The slice of `fluid` that the available additives can convert.
    pub fn convertible(
        &self,
        fluid: &FluidAmount,
        oxidizer: &ItemBatch,
        reducer: &ItemBatch,
        purifier: &ItemBatch,
    ) -> FluidAmount {
        let conversions = self.conversions(fluid, oxidizer, reducer, purifier);
        fluid.with_volume(conversions * self.input.volume)
    }

    /// Maximum output for `input` at `temperature`, assuming unlimited
    /// additives. Charges are only respected when `input` comes from
    /// [`MixRecipe::convertible`]; [`MixRecipe::capped_output`] does both.
    pub fn get_output(&self, input: &FluidAmount, temperature: i32) -> FluidAmount {
        let conversions = input.volume / self.input.volume;
        let per_conversion = self.output.volume_per_conversion(temperature);
        FluidAmount::new(
            self.output.fluid(),
            conversions.saturating_mul(per_conversion),
        )
    }

    /// Output for the whole vessel contents, capped by fluid volume and by
    /// the charges of every additive that can be consumed.
    pub fn capped_output(
        &self,
        fluid: &FluidAmount,
        oxidizer: &ItemBatch,
        reducer: &ItemBatch,
        purifier: &ItemBatch,
        temperature: i32,
    ) -> FluidAmount {
        let convertible = self.convertible(fluid, oxidizer, reducer, purifier);
        self.get_output(&convertible, temperature)
    }

    /// Output of one conversion, independent of current state. `None` when
    /// the output depends on heat.
    pub fn nominal_output(&self) -> Option<FluidAmount> {
        self.output.nominal()
    }

    /// Roll consumption for every conversion represented by `fluid`.
    ///
    /// Call at most once per mixing operation, after `matches` and `can_mix`.
    /// Below the recipe's temperature nothing is consumed.
    pub fn update_additives(
        &self,
        fluid: &FluidAmount,
        oxidizer: &mut ItemBatch,
        reducer: &mut ItemBatch,
        purifier: &mut ItemBatch,
        temperature: i32,
        rng: &mut impl RandomSource,
    ) {
        if temperature < self.min_temperature || fluid.kind != self.input.kind {
            return;
        }
        let conversions = fluid.volume / self.input.volume;
        for (batch, slot) in [oxidizer, reducer, purifier]
            .into_iter()
            .zip(AdditiveSlot::ALL)
        {
            let Some(rule) = self.matching_rule(slot, batch) else {
                continue;
            };
            if !rule.consumes() {
                continue;
            }
            for _ in 0..conversions {
                if batch.is_empty() {
                    break;
                }
                if rule.roll_consumed(rng) {
                    batch.shrink(1);
                }
            }
        }
    }
}
