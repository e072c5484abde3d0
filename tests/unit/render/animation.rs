use super::*;
use image::Rgba;

fn frame(shade: u8, transient: bool, dirty: Option<PixelRect>) -> Frame {
    Frame {
        image: RgbaImage::from_pixel(8, 6, Rgba([shade, shade, shade, 255])),
        transient,
        dirty,
    }
}

fn rect(x0: u32, y0: u32, x1: u32, y1: u32) -> PixelRect {
    PixelRect { x0, y0, x1, y1 }
}

fn timing(delay: u32, reveal: u32) -> TimingConfig {
    TimingConfig {
        frame_delay_ms: delay,
        number_display_ms: reveal,
        ..TimingConfig::default()
    }
}

#[test]
fn zero_length_transient_is_folded_into_the_next_frame() {
    let t = timing(1000, 1000);
    let asm = AnimationAssembler::new(t, &RenderSettings::for_animated_diagram());
    let out = asm
        .assemble(vec![
            frame(10, false, None),
            frame(20, true, Some(rect(1, 1, 3, 3))),
            frame(30, false, Some(rect(4, 2, 6, 4))),
        ])
        .unwrap();

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].duration_ms, t.start_freeze_ms);
    assert_eq!(out[1].duration_ms, t.end_freeze_ms);
    assert_eq!(out[0].region, rect(0, 0, 8, 6));
    assert_eq!(out[1].region, rect(1, 1, 6, 4));
    assert_eq!(out[1].image.get_pixel(0, 0).0[0], 30);
}

#[test]
fn transients_get_the_remaining_delay() {
    let asm = AnimationAssembler::new(timing(1500, 500), &RenderSettings::for_animated_game());
    let out = asm
        .assemble(vec![
            frame(1, false, None),
            frame(2, false, Some(rect(0, 0, 2, 2))),
            frame(3, true, Some(rect(0, 0, 2, 2))),
            frame(4, false, Some(rect(2, 2, 4, 4))),
            frame(5, true, Some(rect(2, 2, 4, 4))),
        ])
        .unwrap();

    let durations: Vec<u32> = out.iter().map(|f| f.duration_ms).collect();
    assert_eq!(durations, vec![3000, 500, 1000, 500, 10000]);
    assert_eq!(asm.transient_duration_ms(), 1000);
}

#[test]
fn final_transient_is_dropped_when_numbers_stay_at_the_end() {
    let asm = AnimationAssembler::new(timing(1500, 500), &RenderSettings::for_animated_diagram());
    let out = asm
        .assemble(vec![
            frame(1, false, None),
            frame(2, false, Some(rect(0, 0, 2, 2))),
            frame(3, true, Some(rect(0, 0, 2, 2))),
        ])
        .unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[1].image.get_pixel(0, 0).0[0], 2);
    assert_eq!(out[1].duration_ms, 10000);
}

#[test]
fn maintained_numbers_use_the_full_delay() {
    let mut settings = RenderSettings::for_animated_diagram();
    settings.maintain_stone_numbers = true;
    let asm = AnimationAssembler::new(timing(1200, 300), &settings);
    let out = asm
        .assemble((0..4).map(|i| frame(i, false, None)).collect())
        .unwrap();
    let durations: Vec<u32> = out.iter().map(|f| f.duration_ms).collect();
    assert_eq!(durations, vec![3000, 1200, 1200, 10000]);
}

#[test]
fn unchanged_frame_gets_a_minimal_patch() {
    let asm = AnimationAssembler::new(timing(1000, 500), &RenderSettings::for_animated_diagram());
    let out = asm
        .assemble(vec![frame(1, false, None), frame(1, false, None)])
        .unwrap();
    assert_eq!(out[1].region, rect(0, 0, 1, 1));
}

#[test]
fn single_frame_takes_the_end_freeze() {
    let asm = AnimationAssembler::new(TimingConfig::default(), &RenderSettings::default());
    let out = asm.assemble(vec![frame(1, false, None)]).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].duration_ms, TimingConfig::default().end_freeze_ms);
}

#[test]
fn empty_input_is_a_render_error() {
    let asm = AnimationAssembler::new(TimingConfig::default(), &RenderSettings::default());
    assert!(matches!(asm.assemble(Vec::new()), Err(GobanError::Render(_))));
}
