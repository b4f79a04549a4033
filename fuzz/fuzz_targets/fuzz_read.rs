#![no_main]
use libfuzzer_sys::fuzz_target;
use zenplanes::*;

/// Pull `N` bytes off the front of `data`, zero-padded.
fn take<const N: usize>(data: &mut &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    let n = data.len().min(N);
    out[..n].copy_from_slice(&data[..n]);
    *data = &data[n..];
    out
}

fuzz_target!(|input: &[u8]| {
    let mut data = input;
    let [cw, ch, frames] = take::<3>(&mut data);
    let canvas = CanvasSize::new(u32::from(cw % 64), u32::from(ch % 64));

    let mut list = Vec::new();
    for _ in 0..(frames % 4) {
        let [x, y, w, h, flags, bits, components, pixel_size] = take::<8>(&mut data);
        let [ps, rs, origin, len] = take::<4>(&mut data);
        let spec = SubImageSpec {
            offset: [u32::from(x % 70), u32::from(y % 70)],
            size: [u32::from(w % 70), u32::from(h % 70)],
            color_space: if flags & 1 == 0 { ColorSpace::Grayscale } else { ColorSpace::Rgb },
            has_alpha: flags & 2 != 0,
            num_components: u32::from(components % 6),
            bits_per_component: u32::from(bits % 40),
            signed: flags & 4 != 0,
        };
        let layout = PlaneLayout::packed(usize::from(pixel_size % 6), spec.size[0])
            .with_origin(usize::from(origin))
            .with_strides(isize::from(ps as i8), isize::from(rs as i8) * 4)
            .with_endian(if flags & 8 == 0 { Endian::Little } else { Endian::Big });
        let n = data.len().min(usize::from(len) * 16);
        let bytes = data[..n].to_vec();
        data = &data[n..];
        let planes = vec![layout; spec.num_components as usize];
        list.push(MemoryFrame::new(spec, bytes, planes));
    }

    // Must never panic, whatever the descriptors claim.
    let Ok(mut reader) = ImageReader::new(MemoryDecoder::new(canvas, list)) else {
        return;
    };
    let _ = reader.read_gray8();
    let _ = reader.read_gray16();
    let _ = reader.read_gray32();
    let _ = reader.read_rgb8();
    let _ = reader.read_rgba8();
});
