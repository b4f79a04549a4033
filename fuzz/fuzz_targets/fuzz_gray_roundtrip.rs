#![no_main]
use libfuzzer_sys::fuzz_target;
use zenplanes::*;

fuzz_target!(|data: &[u8]| {
    // Any 8-bit gray plane must survive Gray8 exactly and Gray16 and back.
    let Some((&w, pixels)) = data.split_first() else {
        return;
    };
    let w = u32::from(w.max(1));
    let h = pixels.len() as u32 / w;
    let pixels = &pixels[..(w * h) as usize];

    let spec = SubImageSpec::new(w, h, ColorSpace::Grayscale, false, 8);
    let frame = MemoryFrame::interleaved(spec, pixels.to_vec(), RowOrder::BottomUp);
    let mut reader = ImageReader::new(MemoryDecoder::single(frame)).unwrap();

    let gray8 = reader.read_gray8().unwrap();
    assert_eq!(gray8.buf().as_slice(), pixels, "gray8 mismatch");

    let gray16 = reader.read_gray16().unwrap();
    for (&wide, &narrow) in gray16.buf().iter().zip(pixels) {
        assert_eq!(rescale(u32::from(wide), 16, 8), u32::from(narrow));
    }
});
