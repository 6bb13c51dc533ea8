//! Source text of the learning scripts attached to scrolls.

use std::fmt::Write;

use crate::SchoolStats;

/// Script run when the player equips (reads) a scribable scroll.
///
/// Reading from the inventory teaches the spell once the player meets the
/// skill requirement of every school involved; the scroll is not consumed.
/// Outside menus the scroll behaves as usual.
pub fn learning_script(
    script_id: &str,
    spell_id: &str,
    spell_name: &str,
    stats: &SchoolStats,
) -> String {
    let mut checks = String::new();
    let mut closes = String::new();
    for stat in stats.required() {
        let _ = write!(
            checks,
            "\n        if (player->Get{} >= {})",
            stat.school.name(),
            stat.accumulated_cost
        );
        closes.push_str("\n        endif");
    }

    format!(
        r#"begin {script_id}
short OnPCEquip
short PCSkipEquip
if (MenuMode == 0)
    return
endif
if (OnPCEquip == 1)
    set OnPCEquip to 0
    if (player->GetSpell "{spell_id}" == 0){checks}
            player->AddSpell "{spell_id}"
            messagebox "You have learned the spell '{spell_name}'!"
            playsound "skillraise"
            return{closes}
        set PCSkipEquip to 0
        messagebox "More study is required to scribe this scroll."
    else
        set PCSkipEquip to 0
    endif
    return
endif
set PCSkipEquip to 1
end {script_id}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::School;

    #[test]
    fn test_script_without_requirements() {
        let text = learning_script("lrn_a", "spl_a", "Scribed A", &SchoolStats::new());
        assert!(text.starts_with("begin lrn_a\nshort OnPCEquip\n"));
        assert!(text.contains("    if (player->GetSpell \"spl_a\" == 0)\n            player->AddSpell \"spl_a\"\n"));
        assert!(text.ends_with("set PCSkipEquip to 1\nend lrn_a\n"));
        assert!(!text.contains("endif\n        endif"));
    }

    #[test]
    fn test_script_gates_on_each_school() {
        let mut stats = SchoolStats::new();
        stats.classify_mut(23).unwrap().accumulated_cost = 28;
        stats.classify_mut(75).unwrap().accumulated_cost = 40;
        let text = learning_script("lrn_b", "spl_b", "Scribed B", &stats);

        let expected = "    if (player->GetSpell \"spl_b\" == 0)\n        \
            if (player->GetDestruction >= 28)\n        \
            if (player->GetRestoration >= 40)\n            \
            player->AddSpell \"spl_b\"\n            \
            messagebox \"You have learned the spell 'Scribed B'!\"\n            \
            playsound \"skillraise\"\n            \
            return\n        endif\n        endif\n        \
            set PCSkipEquip to 0\n";
        assert!(text.contains(expected), "{text}");
        assert_eq!(stats.get(School::Destruction).accumulated_cost, 28);
    }
}
