mod common;

use anyhow::Result;
use cfgsync::output::MemoryLog;
use cfgsync::prompt::{NewestPrompter, ScriptedPrompter};
use cfgsync::sync::{RunOptions, Synchronizer};
use common::{NEW, OLD, SyncFixture, mtime};

const DRY_RUN: RunOptions = RunOptions {
    dry_run: true,
    verbose: false,
};

#[test]
fn test_single_copy_reaches_every_location() -> Result<()> {
    let fx = SyncFixture::with_locations(&["A", "B", "C"])?;
    let source = fx.write(0, "presets/synth/lead.fxp", "lead", OLD)?;

    let mut sync = Synchronizer::new(
        &fx.config,
        RunOptions::default(),
        MemoryLog::new(),
        ScriptedPrompter::default(),
    );
    assert!(sync.run_pass().changed());

    for index in 1..3 {
        let copy = fx.path(index, "presets/synth/lead.fxp");
        assert_eq!(fx.read(index, "presets/synth/lead.fxp")?, "lead");
        assert_eq!(mtime(&copy)?, mtime(&source)?);
    }
    Ok(())
}

#[test]
fn test_second_pass_is_quiescent() -> Result<()> {
    let fx = SyncFixture::new()?;
    fx.write(0, "presets/pad.fxp", "pad", OLD)?;
    fx.write(1, "KeyMaps/default.ReaperKeyMap", "keys", NEW)?;
    fx.write(0, "reaper-vkbmap.txt", "vk", NEW)?;

    let mut first = Synchronizer::new(
        &fx.config,
        RunOptions::default(),
        MemoryLog::new(),
        ScriptedPrompter::default(),
    );
    assert!(first.run_pass().changed());
    let settled = fx.snapshot()?;

    let mut second = Synchronizer::new(
        &fx.config,
        RunOptions::default(),
        MemoryLog::new(),
        ScriptedPrompter::default(),
    );
    let summary = second.run_pass();

    assert!(!summary.changed());
    assert_eq!(fx.snapshot()?, settled);
    assert!(!second.logger().contains("New file detected"));
    assert!(!second.logger().contains("Multiple versions"));
    assert!(second.prompter().asked().is_empty());
    Ok(())
}

#[test]
fn test_auto_replace_skips_copies_already_equal_to_newest() -> Result<()> {
    let fx = SyncFixture::with_locations(&["A", "B", "C"])?;
    fx.write(0, "reaper-vkbmap.txt", "old", OLD)?;
    fx.write(1, "reaper-vkbmap.txt", "newest", NEW)?;
    fx.write(2, "reaper-vkbmap.txt", "newest", NEW)?;

    let mut sync = Synchronizer::new(
        &fx.config,
        RunOptions::default(),
        MemoryLog::new(),
        ScriptedPrompter::default(),
    );
    let summary = sync.run_pass();

    assert_eq!(summary.changed_files, 1);
    assert_eq!(fx.read(0, "reaper-vkbmap.txt")?, "newest");

    let copies: Vec<_> = sync
        .logger()
        .lines()
        .iter()
        .filter(|line| line.contains("Copied"))
        .collect();
    assert_eq!(copies.len(), 1);
    assert!(copies[0].ends_with(&fx.path(0, "reaper-vkbmap.txt").display().to_string()));
    Ok(())
}

#[test]
fn test_copies_differing_only_in_creation_time_are_in_sync() -> Result<()> {
    let fx = SyncFixture::new()?;
    // Written at different instants, so birth times differ where the platform records them
    fx.write(0, "presets/theme.ini", "same", OLD)?;
    std::thread::sleep(std::time::Duration::from_millis(20));
    fx.write(1, "presets/theme.ini", "same", OLD)?;

    let mut sync = Synchronizer::new(
        &fx.config,
        RunOptions::default(),
        MemoryLog::new(),
        ScriptedPrompter::default(),
    );
    assert!(!sync.run_pass().changed());
    assert!(sync.prompter().asked().is_empty());
    Ok(())
}

#[test]
fn test_section_merge_keeps_location_specific_settings() -> Result<()> {
    let fx = SyncFixture::with_locations(&["X", "Y"])?;
    fx.write(0, "REAPER.ini", "[reaper]\naudio=asio\n[Recent]\na.rpp\n", OLD)?;
    fx.write(
        1,
        "REAPER.ini",
        "[reaper]\naudio=wasapi\n[Recent]\nb.rpp\nc.rpp\n[Theme]\ndark\n",
        NEW,
    )?;

    let mut sync = Synchronizer::new(
        &fx.config,
        RunOptions::default(),
        MemoryLog::new(),
        ScriptedPrompter::default(),
    );
    assert!(sync.run_pass().changed());

    let merged = fx.read(0, "REAPER.ini")?;
    assert_eq!(merged, "[reaper]\naudio=asio\n[Recent]\nb.rpp\nc.rpp\n");
    assert!(!merged.contains("[Theme]"));
    assert!(sync.logger().contains("No [RecentFX] section found"));
    assert!(fx.read(1, "REAPER.ini")?.contains("audio=wasapi"));
    Ok(())
}

#[test]
fn test_merge_file_present_once_is_copied_whole() -> Result<()> {
    let fx = SyncFixture::new()?;
    fx.write(1, "REAPER.ini", "[Recent]\na.rpp\n[audio]\nrate=48000\n", NEW)?;

    let mut sync = Synchronizer::new(
        &fx.config,
        RunOptions::default(),
        MemoryLog::new(),
        ScriptedPrompter::default(),
    );
    assert!(sync.run_pass().changed());
    assert_eq!(
        fx.read(0, "REAPER.ini")?,
        "[Recent]\na.rpp\n[audio]\nrate=48000\n"
    );
    Ok(())
}

#[test]
fn test_dry_run_mutates_nothing_and_agrees_with_live_run() -> Result<()> {
    let fx = SyncFixture::new()?;
    fx.write(0, "REAPER.ini", "[Recent]\na.rpp\n", OLD)?;
    fx.write(1, "REAPER.ini", "[Recent]\nb.rpp\n", NEW)?;
    fx.write(0, "presets/lead.fxp", "lead", OLD)?;
    fx.write(0, "KeyMaps/main.ReaperKeyMap", "a", OLD)?;
    fx.write(1, "KeyMaps/main.ReaperKeyMap", "bb", NEW)?;
    let before = fx.snapshot()?;

    let mut dry = Synchronizer::new(&fx.config, DRY_RUN, MemoryLog::new(), NewestPrompter);
    let simulated = dry.run_pass();
    assert_eq!(fx.snapshot()?, before);
    assert!(dry.logger().contains("[DRY RUN] Would copy"));
    assert!(dry.logger().contains("[DRY RUN] Would replace [Recent]"));

    let mut live = Synchronizer::new(
        &fx.config,
        RunOptions::default(),
        MemoryLog::new(),
        NewestPrompter,
    );
    let applied = live.run_pass();

    assert_eq!(simulated.changed(), applied.changed());
    assert_eq!(simulated.changed_files, applied.changed_files);
    assert_ne!(fx.snapshot()?, before);
    Ok(())
}

#[test]
fn test_operator_picks_copy_by_index() -> Result<()> {
    let fx = SyncFixture::with_locations(&["A", "B", "C"])?;
    fx.write(0, "presets/bass.fxp", "a", OLD)?;
    fx.write(1, "presets/bass.fxp", "bb", NEW)?;
    fx.write(2, "presets/bass.fxp", "ccc", OLD + 10)?;

    // Newest first: B, C, A. Keep C.
    let mut sync = Synchronizer::new(
        &fx.config,
        RunOptions::default(),
        MemoryLog::new(),
        ScriptedPrompter::new(["2"]),
    );
    assert!(sync.run_pass().changed());

    for index in 0..3 {
        assert_eq!(fx.read(index, "presets/bass.fxp")?, "ccc");
    }
    assert_eq!(sync.prompter().asked(), ["Which copy should be kept?"]);
    Ok(())
}

#[test]
fn test_out_of_range_choice_skips_only_that_file() -> Result<()> {
    let fx = SyncFixture::with_locations(&["A", "B", "C"])?;
    fx.write(0, "presets/a.fxp", "a", OLD)?;
    fx.write(1, "presets/a.fxp", "bb", NEW)?;
    fx.write(2, "presets/a.fxp", "ccc", OLD + 10)?;
    fx.write(0, "presets/b.fxp", "b", OLD)?;
    fx.write(1, "presets/b.fxp", "bbbb", NEW)?;

    let mut sync = Synchronizer::new(
        &fx.config,
        RunOptions::default(),
        MemoryLog::new(),
        ScriptedPrompter::new(["7", "y"]),
    );
    let summary = sync.run_pass();

    assert_eq!(summary.errors, 1);
    assert!(sync.logger().contains("Invalid choice '7' (expected 1-3)"));
    assert_eq!(fx.read(0, "presets/a.fxp")?, "a");
    assert_eq!(fx.read(0, "presets/b.fxp")?, "bbbb");
    assert_eq!(fx.read(2, "presets/b.fxp")?, "bbbb");
    Ok(())
}

#[test]
fn test_ignored_files_are_never_synchronized() -> Result<()> {
    let fx = SyncFixture::new()?;
    fx.write(0, "presets/lead.fxp.bak", "backup", OLD)?;

    let mut sync = Synchronizer::new(
        &fx.config,
        RunOptions::default(),
        MemoryLog::new(),
        ScriptedPrompter::default(),
    );
    assert!(!sync.run_pass().changed());
    assert!(!fx.path(1, "presets/lead.fxp.bak").exists());
    Ok(())
}

#[test]
fn test_dry_run_agrees_when_sections_differ_only_by_line_terminator() -> Result<()> {
    let fx = SyncFixture::new()?;
    fx.write(0, "REAPER.ini", "[Recent]\nb.rpp\n[audio]\nrate=44100\n", OLD)?;
    fx.write(1, "REAPER.ini", "[audio]\nrate=48000\n[Recent]\nb.rpp", NEW)?;
    let before = fx.snapshot()?;

    let mut dry = Synchronizer::new(&fx.config, DRY_RUN, MemoryLog::new(), NewestPrompter);
    let simulated = dry.run_pass();
    assert!(!dry.logger().contains("Would replace [Recent]"));

    let mut live = Synchronizer::new(
        &fx.config,
        RunOptions::default(),
        MemoryLog::new(),
        NewestPrompter,
    );
    let applied = live.run_pass();

    assert_eq!(simulated.changed(), applied.changed());
    assert!(!applied.changed());
    assert_eq!(fx.snapshot()?, before);
    Ok(())
}

#[test]
fn test_unreadable_merge_file_is_logged_and_pass_continues() -> Result<()> {
    let fx = SyncFixture::new()?;
    let binary = fx.path(0, "REAPER.ini");
    std::fs::create_dir_all(binary.parent().unwrap())?;
    std::fs::write(&binary, [0u8, 159, 146, 150, 0, 1, 0, 0])?;
    common::set_mtime(&binary, NEW)?;
    fx.write(1, "REAPER.ini", "[Recent]\na.rpp\n", OLD)?;
    fx.write(1, "presets/lead.fxp", "lead", OLD)?;

    let mut sync = Synchronizer::new(
        &fx.config,
        RunOptions::default(),
        MemoryLog::new(),
        ScriptedPrompter::default(),
    );
    let summary = sync.run_pass();

    assert_eq!(summary.errors, 1);
    assert!(sync.logger().contains("Error: Cannot merge"));
    assert_eq!(fx.read(1, "REAPER.ini")?, "[Recent]\na.rpp\n");
    assert_eq!(fx.read(0, "presets/lead.fxp")?, "lead");
    Ok(())
}

#[test]
fn test_operator_can_keep_the_older_of_two_copies() -> Result<()> {
    let fx = SyncFixture::new()?;
    fx.write(0, "presets/bass.fxp", "older", OLD)?;
    fx.write(1, "presets/bass.fxp", "newest", NEW)?;

    // Newest first, so the older copy is option 2
    let mut sync = Synchronizer::new(
        &fx.config,
        RunOptions::default(),
        MemoryLog::new(),
        ScriptedPrompter::new(["2"]),
    );
    assert!(sync.run_pass().changed());

    assert_eq!(fx.read(1, "presets/bass.fxp")?, "older");
    assert!(sync.logger().contains("Keeping the copy from 'Portable'"));
    Ok(())
}
