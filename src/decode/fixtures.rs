// Mon Oct 19 2026 - Alex

//! Canonical 64-bit container descriptors and snapshot builders for tests.

use crate::memory::{Address, ImageMemory, MemoryWriter};
use crate::types::{TypeDescriptor, TypeKind, TypeRegistry};

pub const BASE: u64 = 0x1000;
pub const IMAGE_SIZE: usize = 0x2000;

pub const OFFSET_VEC_INT: &str = "cista::basic_vector<int, cista::offset_ptr<int>, false, unsigned int>";
pub const RAW_VEC_INT: &str = "cista::basic_vector<int, int*, false, unsigned int>";
pub const OFFSET_STRING: &str = "cista::basic_string<cista::offset_ptr<char const>>";
pub const RAW_STRING: &str = "cista::basic_string<char const*>";
pub const BITSET_70: &str = "cista::bitset<70>";
pub const VARIANT_3: &str = "cista::variant<char, int, double>";
pub const TUPLE_3: &str = "cista::tuple<char, int, double>";
pub const INT_MAP: &str = "cista::hash_storage<cista::pair<int, int>, cista::offset_ptr>";
pub const STRING_MAP: &str = "cista::hash_storage<cista::pair<cista::basic_string<cista::offset_ptr<char const>>, int>, cista::offset_ptr>";
pub const RAW_INT_MAP: &str = "cista::hash_storage<cista::pair<int, int>, cista::raw::ptr>";
pub const INT_SET: &str = "cista::hash_storage<int, cista::offset_ptr>";
pub const OFFSET_PTR_INT: &str = "cista::offset_ptr<int>";

pub fn image() -> ImageMemory {
    let mut image = ImageMemory::new();
    image
        .map_zeroed(Address::new(BASE), IMAGE_SIZE)
        .expect("fresh image");
    image
}

pub fn addr(value: u64) -> Address {
    Address::new(value)
}

/// Stores a self-relative pointer at `storage` aimed at `target`.
pub fn put_offset_ptr(image: &mut ImageMemory, storage: u64, target: u64) {
    image
        .write_i64(addr(storage), target as i64 - storage as i64)
        .expect("mapped");
}

pub fn put_null_offset_ptr(image: &mut ImageMemory, storage: u64) {
    image.write_i64(addr(storage), i64::MIN).expect("mapped");
}

pub fn put_u32(image: &mut ImageMemory, at: u64, value: u32) {
    image.write_u32(addr(at), value).expect("mapped");
}

pub fn put_u64(image: &mut ImageMemory, at: u64, value: u64) {
    image.write_u64(addr(at), value).expect("mapped");
}

pub fn put_bytes(image: &mut ImageMemory, at: u64, bytes: &[u8]) {
    image.write_bytes(addr(at), bytes).expect("mapped");
}

/// Writes a relocatable vector header at `at` whose elements live at `data`.
pub fn put_int_vector(image: &mut ImageMemory, at: u64, data: u64, values: &[i32]) {
    put_offset_ptr(image, at, data);
    put_u32(image, at + 8, values.len() as u32);
    put_u32(image, at + 12, values.len() as u32);
    for (i, v) in values.iter().enumerate() {
        put_u32(image, data + 4 * i as u64, *v as u32);
    }
}

/// Writes a relocatable string at `at`; long contents go to `heap`.
pub fn put_string(image: &mut ImageMemory, at: u64, heap: u64, text: &str) {
    let bytes = text.as_bytes();
    if bytes.len() <= 15 {
        put_bytes(image, at, &[1]);
        let mut inline = [0u8; 15];
        inline[..bytes.len()].copy_from_slice(bytes);
        put_bytes(image, at + 1, &inline);
    } else {
        put_bytes(image, at, &[0, 1, 0, 0]);
        put_u32(image, at + 4, bytes.len() as u32);
        put_offset_ptr(image, at + 8, heap);
        put_bytes(image, heap, bytes);
    }
}

fn string_types(registry: &mut TypeRegistry, name: &str, ptr: &str) {
    let heap = format!("cista::generic_string<{}>::heap", ptr);
    let stack = format!("cista::generic_string<{}>::stack", ptr);
    registry.register(
        TypeDescriptor::record(&heap, 16, 8)
            .with_field("is_short_", "bool", 0)
            .with_field("self_allocated_", "bool", 1)
            .with_field("size_", "unsigned int", 4)
            .with_field("ptr_", ptr, 8),
    );
    registry.register(
        TypeDescriptor::record(&stack, 16, 1)
            .with_field("is_short_", "bool", 0)
            .with_field("s_", "char [15]", 1),
    );
    registry.register(
        TypeDescriptor::record(name, 16, 8)
            .with_type_arg(ptr)
            .with_field("h_", &heap, 0)
            .with_field("s_", &stack, 0),
    );
}

/// Registry with every container shape the tests use.
pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::with_builtins();

    registry.register(TypeDescriptor::pointer("int*", "int"));
    registry.register(TypeDescriptor::pointer("char const*", "char"));
    registry.register(TypeDescriptor::array("char [15]", "char", 15, 1, 1));
    registry.register(TypeDescriptor::array("std::array<unsigned long, 2>", "unsigned long", 2, 8, 8));
    registry.register(TypeDescriptor::new("std::aligned_union_t<0, char, int, double>", 8, 8, TypeKind::Opaque));

    for (name, pointee) in [
        (OFFSET_PTR_INT, "int"),
        ("cista::offset_ptr<char const>", "char"),
        ("cista::offset_ptr<cista::pair<int, int>>", "cista::pair<int, int>"),
        ("cista::offset_ptr<int const>", "int"),
    ] {
        registry.register(
            TypeDescriptor::record(name, 8, 8)
                .with_type_arg(pointee)
                .with_field("offset_", "long", 0),
        );
    }
    registry.register(
        TypeDescriptor::record("cista::offset_ptr<cista::hash_storage<cista::pair<int, int>, cista::offset_ptr>::ctrl_t>", 8, 8)
            .with_field("offset_", "long", 0),
    );

    for (name, ptr) in [(OFFSET_VEC_INT, OFFSET_PTR_INT), (RAW_VEC_INT, "int*")] {
        registry.register(
            TypeDescriptor::record(name, 24, 8)
                .with_type_arg("int")
                .with_type_arg(ptr)
                .with_field("el_", ptr, 0)
                .with_field("used_size_", "unsigned int", 8)
                .with_field("allocated_size_", "unsigned int", 12)
                .with_field("self_allocated_", "bool", 16),
        );
    }

    string_types(&mut registry, OFFSET_STRING, "cista::offset_ptr<char const>");
    string_types(&mut registry, RAW_STRING, "char const*");

    registry.register(
        TypeDescriptor::record(BITSET_70, 16, 8)
            .with_value_arg(70)
            .with_field("blocks_", "std::array<unsigned long, 2>", 0)
            .with_constant("num_blocks", 2)
            .with_constant("bits_per_block", 64),
    );

    registry.register(
        TypeDescriptor::record(VARIANT_3, 16, 8)
            .with_type_arg("char")
            .with_type_arg("int")
            .with_type_arg("double")
            .with_field("idx_", "unsigned char", 0)
            .with_field("storage_", "std::aligned_union_t<0, char, int, double>", 8),
    );

    registry.register(
        TypeDescriptor::record(TUPLE_3, 16, 8)
            .with_type_arg("char")
            .with_type_arg("int")
            .with_type_arg("double"),
    );

    registry.register(
        TypeDescriptor::record("cista::pair<int, int>", 8, 4)
            .with_field("first", "int", 0)
            .with_field("second", "int", 4),
    );
    registry.register(
        TypeDescriptor::record("cista::pair<cista::basic_string<cista::offset_ptr<char const>>, int>", 24, 8)
            .with_field("first", OFFSET_STRING, 0)
            .with_field("second", "int", 16),
    );

    registry.register(
        TypeDescriptor::record(INT_MAP, 40, 8)
            .with_type_arg("cista::pair<int, int>")
            .with_type_arg("cista::offset_ptr")
            .with_field("entries_", "cista::offset_ptr<cista::pair<int, int>>", 0)
            .with_field(
                "ctrl_",
                "cista::offset_ptr<cista::hash_storage<cista::pair<int, int>, cista::offset_ptr>::ctrl_t>",
                8,
            )
            .with_field("size_", "unsigned long", 16)
            .with_field("capacity_", "unsigned long", 24)
            .with_field("growth_left_", "unsigned long", 32),
    );
    // Described by template arguments only; exercises the canonical fallback layout.
    registry.register(
        TypeDescriptor::record(STRING_MAP, 40, 8)
            .with_type_arg("cista::pair<cista::basic_string<cista::offset_ptr<char const>>, int>")
            .with_type_arg("cista::offset_ptr"),
    );
    registry.register(
        TypeDescriptor::record(RAW_INT_MAP, 40, 8)
            .with_type_arg("cista::pair<int, int>")
            .with_type_arg("cista::raw::ptr"),
    );
    registry.register(
        TypeDescriptor::record(INT_SET, 40, 8)
            .with_type_arg("int")
            .with_type_arg("cista::offset_ptr"),
    );

    registry
}

/// Writes a relocatable hash map header at `at` with entries at `entries`
/// and control bytes at `ctrl`.
pub fn put_hash_map(image: &mut ImageMemory, at: u64, entries: u64, ctrl: u64, size: u64, ctrl_bytes: &[u8]) {
    put_offset_ptr(image, at, entries);
    put_offset_ptr(image, at + 8, ctrl);
    put_u64(image, at + 16, size);
    put_u64(image, at + 24, ctrl_bytes.len() as u64);
    put_bytes(image, ctrl, ctrl_bytes);
}

/// Same header as `put_hash_map` but with absolute pointers.
pub fn put_raw_hash_map(image: &mut ImageMemory, at: u64, entries: u64, ctrl: u64, size: u64, ctrl_bytes: &[u8]) {
    put_u64(image, at, entries);
    put_u64(image, at + 8, ctrl);
    put_u64(image, at + 16, size);
    put_u64(image, at + 24, ctrl_bytes.len() as u64);
    put_bytes(image, ctrl, ctrl_bytes);
}
