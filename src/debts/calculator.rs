use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Amount in the smallest currency unit
pub type Money = i64;

/// Error types for debt calculation input validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DebtError {
    #[error("Unknown purchase {purchase_id} consumed by {consumer}")]
    UnknownPurchase { purchase_id: i64, consumer: String },

    #[error("Purchase {purchase_id} ({title}) has no consumers")]
    ZeroConsumerCount { purchase_id: i64, title: String },
}

/// Result type for debt calculation
pub type DebtResult<T> = Result<T, DebtError>;

/// A purchase as seen by the calculator: its price and how many people share it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub title: String,
    pub unit_price: Money,
    /// Number of distinct consumption records referencing this purchase
    pub consumer_count: i64,
}

impl CatalogItem {
    pub fn new(id: i64, title: impl Into<String>, unit_price: Money, consumer_count: i64) -> Self {
        Self {
            id,
            title: title.into(),
            unit_price,
            consumer_count,
        }
    }

    /// Price of one share, truncated toward zero.
    ///
    /// The remainder of an uneven split stays with the buyer. Returns `None`
    /// when the purchase has no consumers.
    pub fn share(&self) -> Option<Money> {
        self.unit_price.checked_div(self.consumer_count)
    }
}

/// One consumed share of a purchase, with the buyer denormalized onto it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub purchase_id: i64,
    pub consumer_id: i64,
    pub consumer_name: String,
    pub buyer_id: i64,
    pub buyer_name: String,
}

/// A session participant together with everything they consumed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub name: String,
    pub records: Vec<ConsumptionRecord>,
}

impl Participant {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            records: Vec::new(),
        }
    }
}

/// Which side of a debt a history entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The debtor consumed something the creditor paid for
    Outgoing,
    /// The debtor paid for something the creditor consumed
    Incoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub direction: Direction,
    pub item_title: String,
    pub amount: Money,
}

/// Net amount one participant owes another, with the entries that produced it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtEdge {
    pub total_amount: Money,
    pub history: Vec<HistoryEntry>,
}

impl DebtEdge {
    fn record(&mut self, direction: Direction, item_title: &str, amount: Money) {
        match direction {
            Direction::Outgoing => self.total_amount += amount,
            Direction::Incoming => self.total_amount -= amount,
        }
        self.history.push(HistoryEntry {
            direction,
            item_title: item_title.to_string(),
            amount,
        });
    }
}

/// Debtor name -> creditor name -> debt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger(BTreeMap<String, BTreeMap<String, DebtEdge>>);

impl Ledger {
    pub fn get(&self, debtor: &str, creditor: &str) -> Option<&DebtEdge> {
        self.0.get(debtor).and_then(|creditors| creditors.get(creditor))
    }

    /// Creditors of a debtor, sorted by name
    pub fn creditors_of(&self, debtor: &str) -> Option<&BTreeMap<String, DebtEdge>> {
        self.0.get(debtor)
    }

    pub fn debtors(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// All (debtor, creditor, edge) triples, sorted by debtor then creditor
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &DebtEdge)> {
        self.0.iter().flat_map(|(debtor, creditors)| {
            creditors
                .iter()
                .map(move |(creditor, edge)| (debtor.as_str(), creditor.as_str(), edge))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of debtor/creditor pairs
    pub fn edge_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn total_owed_by(&self, debtor: &str) -> Money {
        self.0
            .get(debtor)
            .map(|creditors| creditors.values().map(|edge| edge.total_amount).sum())
            .unwrap_or(0)
    }

    pub fn total_owed_to(&self, creditor: &str) -> Money {
        self.0
            .values()
            .filter_map(|creditors| creditors.get(creditor))
            .map(|edge| edge.total_amount)
            .sum()
    }

    pub fn into_inner(self) -> BTreeMap<String, BTreeMap<String, DebtEdge>> {
        self.0
    }

    fn edge_mut(&mut self, debtor: &str, creditor: &str) -> &mut DebtEdge {
        self.0
            .entry(debtor.to_string())
            .or_default()
            .entry(creditor.to_string())
            .or_default()
    }

    /// Drop non-positive edges, then debtors left without creditors
    fn prune(&mut self) {
        self.0.retain(|_, creditors| {
            creditors.retain(|_, edge| edge.total_amount > 0);
            !creditors.is_empty()
        });
    }
}

/// Pairwise debt calculator.
///
/// Every consumed share is booked twice: as an outgoing amount on the
/// consumer->buyer edge and as an incoming amount on the buyer->consumer edge,
/// so the two directions of a pair always mirror each other. After all records
/// are booked, edges that do not end up positive are pruned, which leaves one
/// net direction per pair.
pub struct DebtCalculator<'a> {
    participants: &'a [Participant],
    catalog: &'a HashMap<i64, CatalogItem>,
}

impl<'a> DebtCalculator<'a> {
    pub fn new(participants: &'a [Participant], catalog: &'a HashMap<i64, CatalogItem>) -> Self {
        Self {
            participants,
            catalog,
        }
    }

    /// Check that every record references a known purchase with at least one consumer
    pub fn validate(&self) -> DebtResult<()> {
        for participant in self.participants {
            for record in &participant.records {
                let item = self.catalog.get(&record.purchase_id).ok_or_else(|| {
                    DebtError::UnknownPurchase {
                        purchase_id: record.purchase_id,
                        consumer: participant.name.clone(),
                    }
                })?;

                if item.consumer_count <= 0 {
                    return Err(DebtError::ZeroConsumerCount {
                        purchase_id: item.id,
                        title: item.title.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Build the pruned ledger.
    ///
    /// Input is expected to have passed [`validate`](Self::validate). Records
    /// that reference an unknown purchase, or a purchase without consumers,
    /// contribute a zero share.
    pub fn calculate(&self) -> Ledger {
        let mut ledger = Ledger::default();

        for participant in self.participants {
            for record in &participant.records {
                let (title, share) = match self.catalog.get(&record.purchase_id) {
                    Some(item) => (item.title.as_str(), item.share().unwrap_or(0)),
                    None => ("", 0),
                };

                ledger
                    .edge_mut(&participant.name, &record.buyer_name)
                    .record(Direction::Outgoing, title, share);

                ledger
                    .edge_mut(&record.buyer_name, &participant.name)
                    .record(Direction::Incoming, title, share);
            }
        }

        ledger.prune();
        ledger
    }

    /// [`validate`](Self::validate) followed by [`calculate`](Self::calculate)
    pub fn calculate_checked(&self) -> DebtResult<Ledger> {
        self.validate()?;
        Ok(self.calculate())
    }
}

/// Group flat consumption records into participants, keeping first-seen order
pub fn group_by_consumer(records: Vec<ConsumptionRecord>) -> Vec<Participant> {
    let mut positions: HashMap<i64, usize> = HashMap::new();
    let mut participants: Vec<Participant> = Vec::new();

    for record in records {
        let index = *positions.entry(record.consumer_id).or_insert_with(|| {
            participants.push(Participant::new(record.consumer_id, record.consumer_name.clone()));
            participants.len() - 1
        });
        participants[index].records.push(record);
    }

    participants
}

/// Index catalog items by purchase id
pub fn index_catalog(items: Vec<CatalogItem>) -> HashMap<i64, CatalogItem> {
    items.into_iter().map(|item| (item.id, item)).collect()
}
