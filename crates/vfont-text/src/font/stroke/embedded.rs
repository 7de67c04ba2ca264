//! Embedded default stroke font
//!
//! A simplex Roman table covering printable ASCII (`' '` to `'~'`),
//! decoded once on first use.

use std::sync::OnceLock;

use super::{decode_glyph, StrokeFont};

const EMBEDDED_FONT_NAME: &str = "simplex";

static DEFAULT_FONT: OnceLock<StrokeFont> = OnceLock::new();

/// Shared default font
pub(super) fn default_font() -> &'static StrokeFont {
    DEFAULT_FONT.get_or_init(|| {
        let glyphs = EMBEDDED_GLYPHS
            .iter()
            .map(|record| decode_glyph(record.as_bytes()))
            .collect();
        let font = StrokeFont::with_glyphs(EMBEDDED_FONT_NAME.to_string(), glyphs);
        tracing::debug!(glyphs = font.len(), "Decoded embedded stroke font");
        font
    })
}

/// Records for `' '..='~'`, in code point order
static EMBEDDED_GLYPHS: &[&str] = &[
    r"JZ", // space
    r"MWRFRT RRYQZR[SZRY", // !
    r"JZNFNM RVFVM", // "
    r"H]SBLb RYBRb RLOZO RKUYU", // #
    r"H\PBP_ RTBT_ RYIWGTFPFMGKIKKLMMNOOUQWRXSYUYXWZT[P[MZKX", // $
    r"F^[FI[ RNFPHPJOLMMKMIKIIJGLFNFPGSHVHYG[F RWTUUTWTYV[X[ZZ[X[VYTWT", // %
    r"E_\O\N[MZMYNXPVUTXRZP[L[JZIYHWHUISJRQNRMSKSIRGPFNGMIMKNNPQUXWZY[[[\Z\Y", // &
    r"MWRHQGRFSGSIRKQL", // '
    r"KYVBTDRGPKOPOTPYR]T`Vb", // (
    r"KYNBPDRGTKUPUTTYR]P`Nb", // )
    r"JZRLRX RMOWU RWOMU", // *
    r"E_RIR[ RIR[R", // +
    r"NVSWRXQWRVSWSYQ[", // ,
    r"E_IR[R", // -
    r"NVRVQWRXSWRV", // .
    r"G][BIb", // /
    r"H\QFNGLJKOKRLWNZQ[S[VZXWYRYOXJVGSFQF", // 0
    r"H\NJPISFS[", // 1
    r"H\LKLJMHNGPFTFVGWHXJXLWNUQK[Y[", // 2
    r"H\MFXFRNUNWOXPYSYUXXVZS[P[MZLYKW", // 3
    r"H\UFKTZT RUFU[", // 4
    r"H\WFMFLOMNPMSMVNXPYSYUXXVZS[P[MZLYKW", // 5
    r"H\XIWGTFRFOGMJLOLTMXOZR[S[VZXXYUYTXQVOSNRNOOMQLT", // 6
    r"H\YFO[ RKFYF", // 7
    r"H\PFMGLILKMMONSOVPXRYTYWXYWZT[P[MZLYKWKTLRNPQOUNWMXKXIWGTFPF", // 8
    r"H\XMWPURRSQSNRLPKMKLLINGQFRFUGWIXMXRWWUZR[P[MZLX", // 9
    r"NVROQPRQSPRO RRVQWRXSWRV", // :
    r"NVROQPRQSPRO RSWRXQWRVSWSYQ[", // ;
    r"F^ZIJRZ[", // <
    r"E_IO[O RIU[U", // =
    r"F^JIZRJ[", // >
    r"I[LKLJMHNGPFTFVGWHXJXLWNVORQRT RRYQZR[SZRY", // ?
    r"E`WNVLTKQKOLNMMPMSNUPVSVUUVS RQKOMNPNSOUPV RWKVSVUXVZV\T]Q]O\L[JYHWGTFQFNGLHJJILHOHRIUJWLYNZQ[T[WZYYZX RXKWSWUXV", // @
    r"I[RFJ[ RRFZ[ RMTWT", // A
    r"G\KFK[ RKFTFWGXHYJYLXNWOTP RKPTPWQXRYTYWXYWZT[K[", // B
    r"H]ZKYIWGUFQFOGMILKKNKSLVMXOZQ[U[WZYXZV", // C
    r"G\KFK[ RKFRFUGWIXKYNYSXVWXUZR[K[", // D
    r"H[LFL[ RLFYF RLPTP RL[Y[", // E
    r"HZLFL[ RLFYF RLPTP", // F
    r"H]ZKYIWGUFQFOGMILKKNKSLVMXOZQ[U[WZYXZVZS RUSZS", // G
    r"G]KFK[ RYFY[ RKPYP", // H
    r"NVRFR[", // I
    r"JZVFVVUYTZR[P[NZMYLVLT", // J
    r"G\KFK[ RYFKT RPOY[", // K
    r"HYLFL[ RL[X[", // L
    r"F^JFJ[ RJFR[ RZFR[ RZFZ[", // M
    r"G]KFK[ RKFY[ RYFY[", // N
    r"G]PFNGLIKKJNJSKVLXNZP[T[VZXXYVZSZNYKXIVGTFPF", // O
    r"G\KFK[ RKFTFWGXHYJYMXOWPTQKQ", // P
    r"G]PFNGLIKKJNJSKVLXNZP[T[VZXXYVZSZNYKXIVGTFPF RSWY]", // Q
    r"G\KFK[ RKFTFWGXHYJYLXNWOTPKP RRPY[", // R
    r"H\YIWGTFPFMGKIKKLMMNOOUQWRXSYUYXWZT[P[MZKX", // S
    r"JZRFR[ RKFYF", // T
    r"G]KFKULXNZQ[S[VZXXYUYF", // U
    r"I[JFR[ RZFR[", // V
    r"F^HFM[ RRFM[ RRFW[ R\FW[", // W
    r"H\KFY[ RYFK[", // X
    r"I[JFRPR[ RZFRP", // Y
    r"H\YFK[ RKFYF RK[Y[", // Z
    r"KYOBOb RPBPb ROBVB RObVb", // [
    r"KYKFY^", // \
    r"KYTBTb RUBUb RNBUB RNbUb", // ]
    r"JZNIRFVI", // ^
    r"JZJ]Z]", // _
    r"NVSKQMQORPSORNQO", // `
    r"I\XMX[ RXPVNTMQMONMPLSLUMXOZQ[T[VZXX", // a
    r"H[LFL[ RLPNNPMSMUNWPXSXUWXUZS[P[NZLX", // b
    r"I[XPVNTMQMONMPLSLUMXOZQ[T[VZXX", // c
    r"I\XFX[ RXPVNTMQMONMPLSLUMXOZQ[T[VZXX", // d
    r"I[LSXSXQWOVNTMQMONMPLSLUMXOZQ[T[VZXX", // e
    r"MYWFUFSGRJR[ ROMVM", // f
    r"I\XMX]W`VaTbQbOa RXPVNTMQMONMPLSLUMXOZQ[T[VZXX", // g
    r"I\MFM[ RMQPNRMUMWNXQX[", // h
    r"NVQFRGSFREQF RRMR[", // i
    r"MWRFSGTFSERF RSMS^RaPbNb", // j
    r"IZMFM[ RWMMW RQSX[", // k
    r"NVRFR[", // l
    r"CaGMG[ RGQJNLMOMQNRQR[ RRQUNWMZM\N]Q][", // m
    r"I\MMM[ RMQPNRMUMWNXQX[", // n
    r"I\QMONMPLSLUMXOZQ[T[VZXXYUYSXPVNTMQM", // o
    r"H[LMLb RLPNNPMSMUNWPXSXUWXUZS[P[NZLX", // p
    r"I\XMXb RXPVNTMQMONMPLSLUMXOZQ[T[VZXX", // q
    r"KXOMO[ ROSPPRNTMWM", // r
    r"J[XPWNTMQMNNMPNRPSUTWUXWXXWZT[Q[NZMX", // s
    r"MYRFRWSZU[W[ ROMVM", // t
    r"I\MMMWNZP[S[UZXW RXMX[", // u
    r"JZLMR[ RXMR[", // v
    r"G]JMN[ RRMN[ RRMV[ RZMV[", // w
    r"J[MMX[ RXMM[", // x
    r"JZLMR[ RXMR[P_NaLbKb", // y
    r"J[XMM[ RMMXM RM[X[", // z
    r"KYTBRCQDPFPHQJRKSMSOQQ RRCQEQGRISJTLTNSPORSTTVTXSZR[Q]Q_Ra RQSSUSWRYQZP\P^Q`RaTb", // {
    r"NVRBRb", // |
    r"KYPBRCSDTFTHSJRKQMQOSQ RRCSESGRIQJPLPNQPURQTPVPXQZR[S]S_Ra RSSQUQWRYSZT\T^S`RaPb", // }
    r"F^IUISJPLONOPPTSVTXTZS[Q RISJQLPNPPQTTVUXUZT[Q[O", // ~
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_printable_ascii() {
        assert_eq!(EMBEDDED_GLYPHS.len(), ('~' as usize) - (' ' as usize) + 1);
        assert_eq!(default_font().len(), EMBEDDED_GLYPHS.len());
    }

    #[test]
    fn test_records_are_whole_pairs() {
        for (i, record) in EMBEDDED_GLYPHS.iter().enumerate() {
            assert_eq!(record.len() % 2, 0, "record {i} has an odd length");
        }
    }

    #[test]
    fn test_default_font_is_shared() {
        let a = default_font() as *const StrokeFont;
        let b = default_font() as *const StrokeFont;
        assert_eq!(a, b);
    }

    #[test]
    fn test_concurrent_first_use_yields_one_instance() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| default_font() as *const StrokeFont as usize))
            .collect();

        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_max_advance_is_widest_glyph() {
        use crate::font::GlyphSource;

        let font = default_font();
        let widest = (' '..='~')
            .map(|c| font.resolve(c).width())
            .fold(0.0, f32::max);
        assert_eq!(font.max_advance(), widest);
        assert!(widest > 0.0);
    }

    #[test]
    fn test_space_is_blank() {
        let space = default_font().resolve(' ');
        assert!(space.strokes().is_empty());
        assert!(space.width() > 0.0);
    }
}
