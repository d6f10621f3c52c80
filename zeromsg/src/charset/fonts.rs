//! Glyph page data for the three font sets
//!
//! Each page is 10 rows of 21 glyphs, written the way the glyphs appear in
//! the font texture. Multi-character glyphs and glyphs without a plain
//! character equivalent are spelled as bracketed tokens; `#` marks unused
//! slots in the sparser pages.

use super::FontSet;

/// Resolve the five pages (default + four extension pages) of a font set.
///
/// The kanji pages at the tail are shared between builds: the US font reuses
/// the whole Japanese kanji bank, the PAL font only its last two pages.
pub(super) fn pages(set: FontSet) -> [&'static str; 5] {
    match set {
        FontSet::Us => [US_PAGE_1, US_PAGE_2, JP_PAGE_3, JP_PAGE_4, JP_PAGE_5],
        FontSet::Jp => [JP_PAGE_1, JP_PAGE_2, JP_PAGE_3, JP_PAGE_4, JP_PAGE_5],
        FontSet::Eu => [EU_PAGE_1, EU_PAGE_2, EU_PAGE_3, JP_PAGE_4, JP_PAGE_5],
    }
}

const US_PAGE_1: &str = r##"
 ABCDEFGHIJKLMNOPQRST
UVWXYZabcdefghijklmno
pqrstuvwxyz{0}{1}{2}{3}{4}{5}{6}{7}{8}{9}
0123456789あいうえおかきくけこさ
しすせそたちつてとなにぬねのはひふへほまみ
むめもやゆよらりるれろわをんアイウエオカキ
クケコサシスセソタチツテトナニヌネノハヒフ
ヘホマミムメモヤユヨラリルレロワヲンぁ{○}{✕}
{△}{□}ゃゅょっァィゥェォャュョッがぎぐげござ
じずぜぞだ終づでどばびぶべぼぱぴ序充攻ガギ
"##;

const US_PAGE_2: &str = r##"
グゲゴザジズゼゾダ溜貯デドバビブベボパピプ
ぺ"'()-?/·{,};:,.!「」✓✗{pts}　
零一二三四五六七八九十百千万上下前後左右扉
固閉咮面掛屏風向编集霊取材手入階段動棚冬雑
然人形並止押中何不気者廊犠影輿消鏡見返振美
琴音閒夭井粱兄…写鳥居古牲常敗化除効果低用
感度良高暗遠撮钵力少回復薬葉書容器參精神全
香料強肆静作持位槽清水異{常}黑石付伍带性壊電
灯方闇照出母深雪遺思議械目映鍵地銀製小飾赤
鲭塚式陸丸月漆御捌玫射機＝範纳戸足欠仏像金
"##;

const JP_PAGE_1: &str = r##"
　あいうえおかきくけこさしすせそたちつてと
なにぬねのはひふへほまみむめもやゆよらりる
れろわをんぁぃぅぇぉゃゅょっがぎぐげござじ
ずぜぞだぢづでどばびぶべぼぱぴぷぺぽアイウ
エオカキクケコサシスセソタチツテトナニヌネ
ノハヒフヘホマミムメモヤユヨラリルレロワヲ
ンァィゥェォャュョッヴガギグゲゴザジズゼゾ
ダヂヅデドバビブベボパピプペポー…{○}{✕}{△}{□}
0123456789ABCDEFGHIJK
LMNOPQRSTUVWXYZ.,!?「」
"##;

const JP_PAGE_2: &str = r##"
一二三四五六七八九十百千万円年月日時分秒人
大小中上下左右前後内外東西南北口出入門戸扉
手足目耳心体力気血肉骨皮頭顔首肩腕指爪髪声
火水木金土石山川海空天地風雨雪雲光闇影音色
家屋部室階段廊下床壁窓庭井蔵倉塔橋道路村町
見聞話読書写真置取持使用開閉押引回投打殺死
生行来帰立座歩走逃追探求助叫泣笑怒恐怖驚静
霊魂幽鬼神仏社寺墓碑呪縛封印儀式祭祀鏡鈴縄
写真機影絵札帳簿鍵箱棚箪笥人形燭台灯籠蝋燭
古新赤青黒白紫紅金銀銅鉄木綿絹糸布紙筆墨文
"##;

const JP_PAGE_3: &str = r##"
愛悪安暗案以位囲医依衣違遺域育員因引飲院運
映栄営永泳英衛駅園演遠央奥往応横王屋恩温化
加価果架歌河火花荷課貨過快解改械界絵開階外
確学楽活感管関観願危機帰記起技義議客究急救
求球究極業局曲勤禁区苦具空君訓軍郡係形景経
警劇決血件健建研県険験元原現言限己庫湖呼効
向好候光公功構興港号告混査再最妻採済祭細菜
作策冊察刷札殺参散産算酸賛残士氏史司四姉始
指示自事持時次治辞質実写社者謝首受収宿所書
助昭消商章勝乗場状常情織職色信心新親身進図
"##;

const JP_PAGE_4: &str = r##"
数世整星晴清静席石積切接設説雪絶先千川戦線
選然全素組早争相窓草送想像増造側息速族続卒
存損村他多太打体対待代台第題達単担探炭短談
着注柱昼虫忠調丁帳町長鳥直通低停定底庭程敵
的笛鉄店点伝田徒登都度土島投湯等答頭同導童
働堂得特毒独読届内南難二肉日乳任認熱念能脳
波派破馬敗配倍売買麦箱畑発飯晩番否悲費非飛
備美鼻必筆標氷表病品浜貧不付布府負部風服福
複払仏物粉兵平米別辺変編便勉歩保墓報宝放法
望牧本妹枚毎万満味未脈民無名命明迷面毛門夜
"##;

const JP_PAGE_5: &str = r##"
野役約薬油輸勇友有由遊予余預幼用曜葉陽様落
利理里陸律率略流旅両料量良輪類例冷礼歴列練
路労老録論和話腕湾冊景観鑑察折祈鳴響揺籠霧
朧朦幻妖怪祟憑依縋辿彷徨往診廃墟軋悲鳴絶叫
血痕傷跡染滲裂砕崩朽錆腐敷襖障子畳縁側屏風
#####################
#####################
#####################
#####################
#####################
"##;

const EU_PAGE_1: &str = r##"
 ABCDEFGHIJKLMNOPQRST
UVWXYZabcdefghijklmno
pqrstuvwxyz{0}{1}{2}{3}{4}{5}{6}{7}{8}{9}
0123456789{!?}ÀÂÇ{È}ÉÊÎÔ{à}{è}
{é}êîô{ù}ûÄẞËÏÖÜäëïü¡¿Á{É1}Í
ÑÓÚá{é1}íñóú{À}È{É2}ÌÒÙàèéìòù
{Ë}{Ï}Œ{Ch}{LI}{rr}{Rune1}{Rune2}~{Rune3}{Rune4}{Rune5}"'()-?/⸴⹁
;:,.!「」✓✗{pts}âç°#◯‷=ö#{○}{✕}
{△}{□}壱弐参肆伍陸漆捌玖œ#########
#####################
"##;

const EU_PAGE_2: &str = r##"
 ABCDEFGHIJKLMNOPQRST
UVWXYZabcdefghijklmno
pqrstuvwxyz{0}{1}{2}{3}{4}{5}{6}{7}{8}{9}
0123456789{!?}ÀÂÇ{È}ÉÊÎÔ{à}{è}
{é}êîô{ù}ûÄẞËÏÖÜäëïü¡¿Á{É1}Í
ÑÓÚá{é1}íñóú{À}È{É2}ÌÒÙàèéìòù
ËÏŒ{Ch}{LI}{rr}{Rune1}{Rune2}~{Rune3}{Rune4}{Rune5}"'()-?/⸴⹁
;:,.!「」✓✗{pts}âç°#◯‷=ö#{○}{✕}
{△}{□}#########œ#########
#####################
"##;

const EU_PAGE_3: &str = r##"
 ABCDEFGHIJKLMNOPQRST
UVWXYZabcdefghijklmno
pqrstuvwxyz{0}{1}{2}{3}{4}{5}{6}{7}{8}{9}
0123456789{!?}ÀÂÇ{È}ÉÊÎÔ{à}{è}
{é}êîô{ù}ûÄẞËÏÖÜäëïü¡¿Á{É1}Í
ÑÓÚá{é1}íñóú{À}È{É2}ÌÒÙàèéìòù
ËÏŒ{Ch}{LI}{rr}###############
#####################
#####################
#####################
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::{tokenize, FontSet, LAST_PLAIN};

    #[test]
    fn test_every_page_has_full_glyph_count() {
        for set in [FontSet::Us, FontSet::Jp, FontSet::Eu] {
            for page in pages(set) {
                let count = tokenize(page).iter().filter(|t| **t != "\n").count();
                assert_eq!(count, LAST_PLAIN as usize + 1);
            }
        }
    }
}
