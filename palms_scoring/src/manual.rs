/*!

This is the long-form manual for `palms_scoring` and `palmsboard`.

## Input files

The following formats are supported:
* `csv` Delimited text. The delimiter is guessed from the header line among
  `,`, tab, `|` and `;`.
* `excel` Excel workbooks (`.xlsx`, `.xls`). The worksheet named in the
  configuration is read, or the first worksheet otherwise.

The first line holds the column headers. Every other line is one member.
Empty lines are ignored. Files larger than 10 MiB are rejected.

```text
Name,P,A,L,RGI,RGO,V,1-2-1,TYFCB
Sajid Hasan,4,0,1,3,2,1,2,1
Vijay Gupta,3,1,0,0,1,0,1,0
```

### Member names

The member is found with the `First`/`Last` columns when they are present,
otherwise with the first non-empty full-name column among `Member Name`,
`Participant Name`, `Name` and `Member`. The comparison with the roster
ignores case and repeated spaces. Rows without any name are skipped. Rows
with an unknown name are reported and change nothing.

These column names can be changed with `nameColumns` in the configuration.

### Metric columns

Headers are compared in lower case. The short PALMS codes must be the whole
header or a separate word of it, the long forms may appear anywhere.

| metric | headers |
|--------|---------|
| present | `P`, `Present` |
| absent | `A`, `Absent` |
| late | `L`, `Late` |
| medical | `M`, `Medical` |
| substitute | `S`, `Substitute` |
| referrals given inside | `RGI`, `Referrals Given Inside` |
| referrals given outside | `RGO`, `Referrals Given Outside` |
| referrals received inside | `RRI`, `Referrals Received Inside` |
| referrals received outside | `RRO`, `Referrals Received Outside` |
| visitors | `V`, `Visitors` |
| one-to-ones | `1-2-1`, `121`, `One to One` |
| closed business | `TYFCB`, `Thank You For Closed Business` |
| education units | `CEU`, `Continuing Education` |
| inductions | `I`, `Inductions` |
| arrived on time | `On Time` |
| arrived a little late | `Mildly Late`, `Slightly Late` |
| arrived very late | `Significantly Late`, `Very Late` |

Other columns are ignored. Values are added to what the member already has:
uploading the same file twice counts it twice. A cell that is not a number
counts as zero and is listed in the status line. TYFCB cells may carry a
currency sign and thousands separators (`₹1,200`).

## Scoring

| category | points |
|----------|--------|
| attendance | present +10, substitute +5, absent -5, medical 0 |
| late | late -5, on time +10, mildly late +5, significantly late -5 |
| referrals | given inside +5, given outside +10, received 0 |
| visitors | +15 each |
| one-to-ones | +10 each |
| TYFCB | +10 per unit (`tyfcbUnit`, 1 by default) |
| CEU | +5 each |

A team scores the sum of the points of its members plus its bonuses. Each
bonus is awarded once, when the counts of all the members together reach
the threshold:

* 50 one-to-ones: +100
* 30 referrals given outside and 20 given inside: +100
* 10 visitors: +100
* 3 inductions: +150

Teams with the same score keep the order of the configuration file.

## Configuration

```json
{
  "outputSettings": {
    "competitionName": "Spring competition",
    "outputDirectory": "out"
  },
  "teams": [
    {
      "key": "teamA",
      "name": "Team A",
      "captain": "Sajid Hasan",
      "color": "#dc2626",
      "members": ["Sajid Hasan", { "firstName": "Prannav", "lastName": "Khanna" }]
    }
  ],
  "fileSources": [{ "provider": "csv", "filePath": "palms_week1.csv" }]
}
```

Optional fields:
- `nameColumns` (object with `first`, `last`, `full` lists of headers)
- `bonusRules` (list of `{ "label", "points", "requirements": [{ "metric", "atLeast" }] }`,
  replaces the default bonuses). The metrics are `present`, `oneToOnes`,
  `referralsGivenInside`, `referralsGivenOutside`, `referralsGiven`,
  `visitors`, `inductions`, `tyfcb` and `ceu`.
- `tyfcbUnit` (number): the amount of closed business that makes one TYFCB point unit.
- `excelWorksheetName` in a file source.

Member names must be unique across all the teams.

## Command line

The counters are kept in a state file between runs (`--state`, or
`palms_state.json` in the output directory). Each run applies the input
files in order, then the late arrivals given with `--mark-late`, and prints
the leaderboards in JSON. The state is saved after each upload and each late
arrival. A file that fails to upload leaves the counters untouched and stops
the run. `--reset` clears all the counters first.

 */
