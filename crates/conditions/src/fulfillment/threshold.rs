//! Weighted threshold composite (type 2).
//!
//! The condition commits to a weighted multiset of subconditions and a
//! threshold.  A fulfillment reveals subfulfillments whose weights sum to
//! at least the threshold and downgrades every other member to its bare
//! condition.  Members are ordered by the byte order of their canonical
//! pair (`varuint weight || condition binary`), so the serialized form is
//! independent of insertion order.

use ccond_codec::{
    read_var_octet_string, read_var_uint, var_octet_string_len, var_uint_len,
    write_var_octet_string, write_var_uint, BufDecoder, Codec, CodecError, Decoder, Encoder,
};

use crate::condition::Condition;
use crate::errors::{ConditionError, Result};
use crate::fulfillment::Fulfillment;
use crate::type_ids::{FEATURE_SHA_256, FEATURE_THRESHOLD, MAX_THRESHOLD_MEMBERS};

/// One weighted member of a threshold composite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightedMember {
    weight: u32,
    entry: MemberEntry,
}

/// What a member carries: a full proof or just the commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberEntry {
    /// A subfulfillment that can be revealed when serializing.
    Fulfilled(Box<Fulfillment>),
    /// A subcondition only; this member can never count toward the
    /// threshold.
    Unfulfilled(Condition),
}

impl WeightedMember {
    /// Gets the member weight.
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Gets the member entry.
    pub fn entry(&self) -> &MemberEntry {
        &self.entry
    }

    /// The condition this member contributes to the composite hash.
    fn condition(&self) -> Result<Condition> {
        match &self.entry {
            MemberEntry::Fulfilled(f) => f.condition(),
            MemberEntry::Unfulfilled(c) => Ok(c.clone()),
        }
    }

    fn features(&self) -> Result<u32> {
        match &self.entry {
            MemberEntry::Fulfilled(f) => f.features(),
            MemberEntry::Unfulfilled(c) => Ok(c.features()),
        }
    }
}

/// Per-member data in canonical order, shared by hashing, serialization
/// and length prediction.
struct CanonicalMember<'m> {
    member: &'m WeightedMember,
    /// `varuint weight || condition binary`, the sort key and hash
    /// contribution.
    pair: Vec<u8>,
    condition_binary: Vec<u8>,
    condition: Condition,
}

/// Threshold composite fulfillment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThresholdSha256 {
    threshold: u32,
    members: Vec<WeightedMember>,
}

impl ThresholdSha256 {
    /// Constructs a new instance with the given threshold and no members.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            members: Vec::new(),
        }
    }

    /// Gets the threshold.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Replaces the threshold.
    pub fn set_threshold(&mut self, threshold: u32) {
        self.threshold = threshold;
    }

    /// Gets the members in insertion order.
    pub fn members(&self) -> &[WeightedMember] {
        &self.members
    }

    /// Adds a subfulfillment with weight 1.
    pub fn add_subfulfillment(&mut self, subfulfillment: Fulfillment) -> Result<()> {
        self.add_subfulfillment_weighted(subfulfillment, 1)
    }

    /// Adds a subfulfillment with an explicit weight.
    pub fn add_subfulfillment_weighted(
        &mut self,
        subfulfillment: Fulfillment,
        weight: u32,
    ) -> Result<()> {
        self.push_member(MemberEntry::Fulfilled(Box::new(subfulfillment)), weight)
    }

    /// Adds a subcondition with weight 1.
    pub fn add_subcondition(&mut self, subcondition: Condition) -> Result<()> {
        self.add_subcondition_weighted(subcondition, 1)
    }

    /// Adds a subcondition with an explicit weight.
    pub fn add_subcondition_weighted(
        &mut self,
        subcondition: Condition,
        weight: u32,
    ) -> Result<()> {
        self.push_member(MemberEntry::Unfulfilled(subcondition), weight)
    }

    /// Adds a subcondition given as a `cc:` URI.
    pub fn add_subcondition_uri(&mut self, uri: &str) -> Result<()> {
        self.add_subcondition(Condition::parse_uri(uri)?)
    }

    fn push_member(&mut self, entry: MemberEntry, weight: u32) -> Result<()> {
        if weight == 0 {
            return Err(ConditionError::InvalidArgument(
                "member weight must be at least 1".into(),
            ));
        }

        self.members.push(WeightedMember { weight, entry });
        Ok(())
    }

    /// Builds the members in canonical order.
    fn canonical_members(&self) -> Result<Vec<CanonicalMember<'_>>> {
        if self.members.is_empty() {
            return Err(ConditionError::MissingData("subconditions"));
        }

        let mut canonical = Vec::with_capacity(self.members.len());
        for member in &self.members {
            let condition = member.condition()?;
            let condition_binary = condition.to_bytes()?;

            let mut pair = Vec::new();
            write_var_uint(&mut pair, member.weight as u64)?;
            pair.extend_from_slice(&condition_binary);

            canonical.push(CanonicalMember {
                member,
                pair,
                condition_binary,
                condition,
            });
        }

        canonical.sort_by(|a, b| a.pair.cmp(&b.pair));
        Ok(canonical)
    }

    pub(crate) fn features(&self) -> Result<u32> {
        let mut features = FEATURE_SHA_256 | FEATURE_THRESHOLD;
        for member in &self.members {
            features |= member.features()?;
        }
        Ok(features)
    }

    /// The hash commits to the threshold (as a fixed 32-bit integer, the
    /// historical form), the member count and every canonical pair.
    pub(crate) fn write_hash_payload(&self, enc: &mut impl Encoder) -> Result<()> {
        let canonical = self.canonical_members()?;

        self.threshold.encode(enc)?;
        write_var_uint(enc, canonical.len() as u64)?;
        for member in &canonical {
            enc.write_buf(&member.pair)?;
        }
        Ok(())
    }

    pub(crate) fn write_payload(&self, enc: &mut impl Encoder) -> Result<()> {
        let canonical = self.canonical_members()?;

        // Serialized alternatives for every member: reveal the proof or
        // fall back to the bare condition.
        let mut revealed: Vec<Option<Vec<u8>>> = Vec::with_capacity(canonical.len());
        for member in &canonical {
            match &member.member.entry {
                MemberEntry::Fulfilled(f) => revealed.push(Some(f.to_bytes()?)),
                MemberEntry::Unfulfilled(_) => revealed.push(None),
            }
        }

        let choices: Vec<MemberChoice> = canonical
            .iter()
            .zip(&revealed)
            .map(|(member, fulfillment_binary)| MemberChoice {
                weight: member.member.weight as u64,
                fulfilled_len: fulfillment_binary.as_ref().map(|b| {
                    var_uint_len(member.member.weight as u64) + var_octet_string_len(b.len()) + 1
                }),
                condition_len: var_uint_len(member.member.weight as u64)
                    + 1
                    + var_octet_string_len(member.condition_binary.len()),
            })
            .collect();

        let selected = smallest_valid_set(&choices, self.threshold as u64).ok_or_else(|| {
            let present = choices
                .iter()
                .filter(|c| c.fulfilled_len.is_some())
                .map(|c| c.weight)
                .sum();
            ConditionError::ThresholdNotMet {
                required: self.threshold as u64,
                present,
            }
        })?;

        write_var_uint(enc, self.threshold as u64)?;
        write_var_uint(enc, canonical.len() as u64)?;
        for (i, member) in canonical.iter().enumerate() {
            write_var_uint(enc, member.member.weight as u64)?;
            if selected[i] {
                let fulfillment_binary = revealed[i]
                    .as_deref()
                    .ok_or(ConditionError::MissingData("subfulfillment"))?;
                write_var_octet_string(enc, fulfillment_binary)?;
                write_var_octet_string(enc, &[])?;
            } else {
                write_var_octet_string(enc, &[])?;
                write_var_octet_string(enc, &member.condition_binary)?;
            }
        }
        Ok(())
    }

    pub(crate) fn parse_payload(payload: &[u8], depth: usize) -> Result<Self> {
        let mut dec = BufDecoder::new(payload);

        let threshold = read_var_uint(&mut dec)?;
        let threshold = u32::try_from(threshold).map_err(|_| ConditionError::TooLarge {
            what: "threshold",
            len: threshold,
            max: u32::MAX as u64,
        })?;

        let count = read_var_uint(&mut dec)?;
        if count > MAX_THRESHOLD_MEMBERS {
            return Err(ConditionError::TooLarge {
                what: "threshold member count",
                len: count,
                max: MAX_THRESHOLD_MEMBERS,
            });
        }

        let mut composite = Self::new(threshold);
        for _ in 0..count {
            let weight = read_var_uint(&mut dec)?;
            let weight = u32::try_from(weight).map_err(|_| ConditionError::TooLarge {
                what: "member weight",
                len: weight,
                max: u32::MAX as u64,
            })?;

            let fulfillment_binary = read_var_octet_string(&mut dec)?;
            let condition_binary = read_var_octet_string(&mut dec)?;

            match (fulfillment_binary.is_empty(), condition_binary.is_empty()) {
                (false, true) => {
                    let sub = Fulfillment::parse_binary_at_depth(&fulfillment_binary, depth + 1)?;
                    composite.add_subfulfillment_weighted(sub, weight)?;
                }
                (true, false) => {
                    let sub = Condition::from_bytes(&condition_binary)?;
                    composite.add_subcondition_weighted(sub, weight)?;
                }
                _ => {
                    return Err(ConditionError::Malformed(
                        "threshold member must carry exactly one of fulfillment or condition",
                    ));
                }
            }
        }

        if dec.remaining() > 0 {
            return Err(CodecError::ExtraInput.into());
        }

        Ok(composite)
    }

    /// Requires enough fulfilled weight and validates every revealed
    /// subfulfillment against the message.
    pub(crate) fn validate(&self, message: &[u8]) -> Result<()> {
        let present: u64 = self
            .members
            .iter()
            .filter(|m| matches!(m.entry, MemberEntry::Fulfilled(_)))
            .map(|m| m.weight as u64)
            .sum();

        if present < self.threshold as u64 {
            return Err(ConditionError::ThresholdNotMet {
                required: self.threshold as u64,
                present,
            });
        }

        for member in &self.members {
            if let MemberEntry::Fulfilled(sub) = &member.entry {
                sub.validate(message)
                    .map_err(|e| ConditionError::InvalidSubfulfillment(Box::new(e)))?;
            }
        }

        Ok(())
    }

    /// Worst-case payload size, matching the committed accounting: members
    /// outside the worst-case set cost their condition form, members inside
    /// it cost their weight plus a length-prefixed placeholder of the
    /// subcondition's own worst case.
    pub(crate) fn max_fulfillment_length(&self) -> Result<usize> {
        let canonical = self.canonical_members()?;

        struct Projection {
            weight: u64,
            condition_len: usize,
            fulfilled_len: usize,
        }

        let mut projections = Vec::with_capacity(canonical.len());
        for member in &canonical {
            let weight = member.member.weight as u64;
            let sub_max = usize::try_from(member.condition.max_fulfillment_length()).map_err(
                |_| ConditionError::TooLarge {
                    what: "subcondition max fulfillment length",
                    len: member.condition.max_fulfillment_length(),
                    max: usize::MAX as u64,
                },
            )?;

            projections.push(Projection {
                weight,
                condition_len: var_uint_len(weight)
                    + 1
                    + var_octet_string_len(member.condition_binary.len()),
                fulfilled_len: var_uint_len(weight) + var_octet_string_len(sub_max),
            });
        }

        // Pick the worst-case fulfilled set: largest size increase first
        // until the weights cover the threshold.
        let mut order: Vec<usize> = (0..projections.len()).collect();
        order.sort_by_key(|&i| {
            std::cmp::Reverse(projections[i].fulfilled_len as i64 - projections[i].condition_len as i64)
        });

        let mut total: usize = var_uint_len(self.threshold as u64)
            + var_uint_len(projections.len() as u64)
            + projections.iter().map(|p| p.condition_len).sum::<usize>();
        let mut covered: u64 = 0;
        for &i in &order {
            if covered >= self.threshold as u64 {
                break;
            }
            covered += projections[i].weight;
            total += projections[i].fulfilled_len;
            total -= projections[i].condition_len;
        }

        if covered < self.threshold as u64 {
            return Err(ConditionError::MissingData(
                "insufficient subcondition weight for the threshold",
            ));
        }

        Ok(total)
    }
}

/// Serialized-size alternatives for one member during selection.
struct MemberChoice {
    weight: u64,
    /// Cost of revealing the subfulfillment; `None` when the member only
    /// carries a condition.
    fulfilled_len: Option<usize>,
    condition_len: usize,
}

/// Finds the cheapest set of members to reveal whose weights cover the
/// threshold, by branch-and-bound over members in canonical order.
///
/// Returns one flag per member, or `None` when no set covers the
/// threshold.  Ties resolve toward revealing earlier canonical members
/// because the include branch is explored first.
fn smallest_valid_set(choices: &[MemberChoice], threshold: u64) -> Option<Vec<bool>> {
    struct Search<'s> {
        choices: &'s [MemberChoice],
        best_len: Option<usize>,
        best_set: Option<Vec<bool>>,
        current: Vec<bool>,
    }

    impl Search<'_> {
        fn recurse(&mut self, index: usize, still_needed: u64, len_so_far: usize) {
            if let Some(best) = self.best_len {
                if len_so_far >= best {
                    return;
                }
            }

            if index == self.choices.len() {
                if still_needed == 0 {
                    self.best_len = Some(len_so_far);
                    self.best_set = Some(self.current.clone());
                }
                return;
            }

            let choices = self.choices;
            let choice = &choices[index];

            if let Some(fulfilled_len) = choice.fulfilled_len {
                self.current.push(true);
                self.recurse(
                    index + 1,
                    still_needed.saturating_sub(choice.weight),
                    len_so_far + fulfilled_len,
                );
                self.current.pop();
            }

            self.current.push(false);
            self.recurse(index + 1, still_needed, len_so_far + choice.condition_len);
            self.current.pop();
        }
    }

    let mut search = Search {
        choices,
        best_len: None,
        best_set: None,
        current: Vec::with_capacity(choices.len()),
    };
    search.recurse(0, threshold, 0);
    search.best_set
}
