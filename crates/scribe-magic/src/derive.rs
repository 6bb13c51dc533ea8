//! Turning scrolls into learnable spells.

use rustc_hash::FxHashSet;
use scribe_esm::types::{services, Book, Enchantment, Npc, Script, Spell};
use tracing::debug;

use crate::merge::{partition, Corpus, LoadOrder};
use crate::{learning_script, spell_name_from_scroll, CostRoll, SchoolStats};

/// Leveled-item id some plugins use for "any scroll" in merchant stock.
pub const RANDOM_SCROLL: &str = "random_scroll_all";

/// Longest script id that fits the `SCHD` name slot with its terminator.
const MAX_SCRIPT_ID_LEN: usize = 31;

/// Costs above this are treated as broken content.
const MAX_PLAUSIBLE_COST: u32 = 190;

/// Markup appended to scrolls that cannot be learned.
const UNLEARNABLE_TEXT: &str = "<FONT><DIV ALIGN=\"LEFT\"><BR><BR>This scroll strange magic is impossible to learn<BR><BR></FONT>";

/// Markup introducing the skill requirements of a learnable scroll.
const REQUIREMENTS_TEXT: &str = "<FONT><DIV ALIGN=\"LEFT\"><BR><BR>Learning from this scroll requires these skills<BR><BR></FONT>";

/// Service bits of merchants whose stock may include scrolls.
const SCROLL_TRADES: u32 =
    services::BOOKS | services::MISC | services::MAGIC_ITEMS | services::POTIONS;

/// What happens to a scroll.
#[derive(Debug, Clone, Copy)]
pub enum ScrollState<'a> {
    /// Already runs a custom script, which must be kept.
    Scripted,
    /// Its enchantment is missing or deleted.
    NoEnchantment,
    /// Can be turned into a spell.
    Derivable(&'a Enchantment),
}

/// Classify a scroll against the merged enchantments.
pub fn classify_scroll<'a>(book: &Book, enchantments: &'a LoadOrder<Enchantment>) -> ScrollState<'a> {
    if book.script().is_some() {
        return ScrollState::Scripted;
    }

    match book
        .enchantment()
        .and_then(|id| enchantments.get(id))
        .filter(|e| !e.is_deleted())
    {
        Some(enchantment) => ScrollState::Derivable(enchantment),
        None => ScrollState::NoEnchantment,
    }
}

/// Cost of the spell taught by a scroll.
///
/// Absurd costs from broken content become a random value in `180..200`.
pub fn spell_cost<R: CostRoll + ?Sized>(enchantment: &Enchantment, roll: &mut R) -> i32 {
    match enchantment.cost().unwrap_or(0) {
        cost if cost <= MAX_PLAUSIBLE_COST => cost as i32,
        _ => 200 - roll.roll(1, 20),
    }
}

/// Everything a run produces.
#[derive(Debug, Default)]
pub struct Derivation {
    /// Learning scripts, one per derivable scroll.
    pub scripts: Vec<Script>,
    /// Spells, one per derivable scroll.
    pub spells: Vec<Spell>,
    /// Every scroll, with updated text and script.
    pub scrolls: Vec<Book>,
    /// Merchants whose services or stock changed.
    pub npcs: Vec<Npc>,
    /// Scrolls kept with their own script.
    pub scripted: usize,
    /// Scrolls without a usable enchantment.
    pub unlearnable: usize,
}

impl Derivation {
    /// Number of scrolls turned into spells.
    pub fn derived(&self) -> usize {
        self.spells.len()
    }
}

/// Derive the scribe and no-sale records from a merged corpus.
///
/// Each scroll is processed once. Skill requirements are scored with a
/// fresh [`SchoolStats`] per enchantment.
pub fn derive<R: CostRoll + ?Sized>(corpus: Corpus, roll: &mut R) -> Derivation {
    let Corpus {
        books,
        enchantments,
        npcs,
    } = corpus;

    let mut out = Derivation::default();
    let scrolls = books.into_iter().filter(Book::is_scroll);
    let (scripted, unscripted) = partition(scrolls, |b| b.script().is_some());

    for mut book in scripted {
        book.append_text(UNLEARNABLE_TEXT);
        out.scrolls.push(book);
        out.scripted += 1;
    }

    let mut restricted: FxHashSet<String> = FxHashSet::default();
    for mut book in unscripted {
        restricted.insert(book.id().to_string());

        let enchantment = match classify_scroll(&book, &enchantments) {
            ScrollState::Derivable(enchantment) => enchantment,
            ScrollState::Scripted | ScrollState::NoEnchantment => {
                debug!(scroll = book.id(), "enchantment missing, marking unlearnable");
                book.append_text(UNLEARNABLE_TEXT);
                out.scrolls.push(book);
                out.unlearnable += 1;
                continue;
            }
        };

        let stats = SchoolStats::from_effects(enchantment.effects(), roll);

        let mut script_id = format!("lrn_{}", book.id());
        script_id.truncate(MAX_SCRIPT_ID_LEN);
        let spell_id = format!("spl_{}", book.id());
        let spell_name = spell_name_from_scroll(book.id(), book.name().unwrap_or(book.id()));

        book.set_script(script_id.as_str());
        book.append_text(REQUIREMENTS_TEXT);
        for stat in stats.required() {
            book.append_text(&format!(
                "<FONT COLOR=\"{}\"><DIV ALIGN=\"LEFT\">{} {}<BR></FONT>",
                stat.school.color(),
                stat.accumulated_cost,
                stat.school.name()
            ));
        }

        let text = learning_script(&script_id, &spell_id, &spell_name, &stats);
        let cost = spell_cost(enchantment, roll);
        debug!(scroll = book.id(), spell = %spell_name, cost, "derived spell");

        out.scripts.push(Script::new(script_id, text));
        out.spells.push(Spell::new(
            spell_id,
            spell_name,
            cost,
            enchantment.raw_effects().to_vec(),
        ));
        out.scrolls.push(book);
    }

    restricted.insert(RANDOM_SCROLL.to_string());
    out.npcs = restrict_merchants(npcs, &restricted);
    out
}

/// Stop merchants from selling spells and the given scrolls.
///
/// Only merchants that actually change are returned.
fn restrict_merchants(npcs: LoadOrder<Npc>, restricted: &FxHashSet<String>) -> Vec<Npc> {
    let mut changed = Vec::new();

    for mut npc in npcs {
        if npc.is_deleted() || npc.ai_flags().is_none() {
            continue;
        }

        let mut modified = npc.withdraw(services::SPELLS);
        if npc.offers(SCROLL_TRADES) && !npc.inventory().is_empty() {
            modified |= npc.retain_inventory(|item| !restricted.contains(&item.id));
        }

        if modified {
            debug!(npc = npc.id(), "restricted merchant");
            changed.push(npc);
        }
    }

    changed
}
