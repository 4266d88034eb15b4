//! Fixed keys and expected encodings shared by the unit tests.
//!
//! Orchard components and default receivers are the published Orchard key
//! component vectors; the Juno encodings were produced from them.

pub struct OrchardKeyVector {
    pub ak: &'static str,
    pub nk: &'static str,
    pub rivk: &'static str,
    pub default_d: &'static str,
    pub default_pk_d: &'static str,
    /// Mainnet UFVK holding only this Orchard key.
    pub ufvk: &'static str,
    /// Mainnet UA for index 0.
    pub ua_index_0: &'static str,
}

fn hex_array<const N: usize>(s: &str) -> [u8; N] {
    let bytes = hex::decode(s).unwrap();
    bytes.try_into().unwrap()
}

impl OrchardKeyVector {
    pub fn fvk_bytes(&self) -> [u8; 96] {
        let mut out = [0u8; 96];
        out[..32].copy_from_slice(&hex_array::<32>(self.ak));
        out[32..64].copy_from_slice(&hex_array::<32>(self.nk));
        out[64..].copy_from_slice(&hex_array::<32>(self.rivk));
        out
    }

    pub fn default_d(&self) -> [u8; 11] {
        hex_array(self.default_d)
    }

    pub fn default_pk_d(&self) -> [u8; 32] {
        hex_array(self.default_pk_d)
    }
}

pub const ORCHARD_KEY_VECTORS: &[OrchardKeyVector] = &[
    OrchardKeyVector {
        ak: "740bbe5d0580b2cad430180d02cc128b9a140d5e07c151721dc16d25d4e20f15",
        nk: "9f2f826738945ad01f47f70db0c367c246c20c61ff5583948c39dea968fefd1b",
        rivk: "021ccf89604f5f7cc6e034b32d338908b819fbe325fee6458b56b4ca71a7e43d",
        default_d: "8ff3386971cb64b8e77899",
        default_pk_d: "08dd8ebd7de92a68e586a34db8fea999efd2016fae76750afae7ee941646bcb9",
        ufvk: "jview14ydwl2n4jpzqr9263l874epx7n2elrxp0ym7kahylwmuz6p3zszm6m8trm0pj5jwvjlcxqmap9psdneal4vyx2gk89eud2capgz5rwclx0m4w5utxscmyreuzrxd6vgp7zdf5qv5ccu99cs5q9prmegvr3gdra9jxx7nth4z70j3ruj0qpeefyqa0az4m",
        ua_index_0: "j1agdak48un5885yeadk5ngzsswqm6tljmmhjazz4hdhkpedzfehpywt03d4kvnugfdjt2q85km7fplavw6f7yjmrzqfn593wdkua7vxme",
    },
    OrchardKeyVector {
        ak: "6de1349830d66d7b97fe231fc7b02ad64323629cfed1e3aa24ef052f56e4002a",
        nk: "a8b73d979b6eaada8924bcbdc63a9ef4e87346f230aba6bbe1e2b43c5bea6b22",
        rivk: "dacb2f2a9ced363171821aaf5d8cd902bc5e3a5a41fb51ae61a9f02dc89d1d12",
        default_d: "7807ca650858814d5022a8",
        default_pk_d: "3d3de4d52c77fd0b630a40dc38212487b2ff6eeef56d8c6a6163e854aff04189",
        ufvk: "jview18rkn64t82w465qr63ma4kzr20v6aay5e5m4q094gfxhe2wvnmc89uwxng55mfewdnft67zv9cplkhkds9efltpfz06w9xgmc3cxdpfkdzpf3kyuudhlkxmv09y60kp8hcrf0v0wcp0mnjahqfhr4xlmu5pjx4q8lnt5472lrsu6twmtcfpyv5hc52337x",
        ua_index_0: "j1mqpl9nnkwznjn9fy3wwh6v5chj37avc3cqv8n38f7ygd8g6jnr3ezhpv9e9lcytwqudqu0krdtu09q7rl9pkeexwg0rqvvjxwuwfjm8r",
    },
];

/// Orchard diversifiers of the first vector's key at indices 1 and 5.
pub const ORCHARD_TV0_D_INDEX_1: &str = "58d291e1780d7fe4eb9464";
pub const ORCHARD_TV0_D_INDEX_5: &str = "139c926eadfdaeabc23a55";

/// First vector's key encoded for testnet.
pub const ORCHARD_TV0_UFVK_TEST: &str = "jviewtest1wh265808djt0qjh3806edtpwwm2nekm4l6l0l5zcu08jvyczrkp7qgj9w470urv7cdpjazp94ru593qc9q3vu5c4qzpyzjnv8lgqmkj009uwc4jj3pwemxcy8ddnyzuwdxpaxuujxvfv9awdwntg0as66gyflzd7nk2ftxnsdykhl8dqjfljvmq4dq5da";

/// First vector's Orchard key plus an item with unassigned typecode 0x10.
pub const UFVK_WITH_UNKNOWN_ITEM: &str = "jview1qjzrpdmtq2c240kxwkxq9zgdgser6yc7vd070ulzjp48h3t0e23htuv82rfmnnuphc8qmkk34f6qj7tl3sllw85cwqfl6qnpcnsqwekm68akrqasvz82dtnsfpuhncpzhrthg8j5x6gtp4khlzajrxqwwvyr7egzl8rh7jqt4242daehpn3vd653xturw5nkuwq6wzfd069r9cha4evz87xkvj6942esrrwhwqfkc3ncwhykstn";
